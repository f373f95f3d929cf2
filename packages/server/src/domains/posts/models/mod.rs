pub mod entities;
pub mod post;
pub mod rsvp;

pub use entities::*;
pub use post::*;
pub use rsvp::*;
