mod actor;
mod buy_request;
mod category;
mod common;
mod feedback;
mod order;
mod product;
mod return_request;
mod user;

pub use self::{
    actor::*, buy_request::*, category::*, common::*, feedback::*, order::*, product::*,
    return_request::*, user::*,
};
