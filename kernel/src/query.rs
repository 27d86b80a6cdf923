mod buy_request;
mod category;
mod feedback;
mod order;
mod product;
mod return_request;

pub use self::{
    buy_request::*, category::*, feedback::*, order::*, product::*, return_request::*,
};
