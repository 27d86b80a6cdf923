mod status;
mod time;

pub(crate) use self::status::*;
pub use self::time::*;
