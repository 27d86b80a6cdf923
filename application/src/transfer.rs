mod buy_request;
mod feedback;
mod order;
mod product;
mod return_request;

pub use self::{buy_request::*, feedback::*, order::*, product::*, return_request::*};
