pub mod clock;
pub mod controller;
pub mod turn;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::SessionController;
pub use turn::{Feedback, Screen, SessionCounts, SessionError};
