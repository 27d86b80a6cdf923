mod id;
mod role;

pub use self::{id::*, role::*};
