mod buy_request;
mod feedback;
mod order;
mod return_request;

pub use self::{buy_request::*, feedback::*, order::*, return_request::*};
