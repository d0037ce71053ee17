pub mod account;
pub mod achievement;
pub mod circular;
pub mod feedback;
pub mod registration_link;
pub mod student_id;

pub use account::*;
pub use achievement::*;
pub use circular::*;
pub use feedback::*;
pub use registration_link::*;
