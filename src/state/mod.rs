//! Status envelopes for asynchronous work.
//!
//! [`AsyncState`] is the four-valued `idle/loading/success/error` envelope the
//! view layer renders from; [`AsyncOp`] drives one asynchronous function
//! through it with request fencing.

mod async_state;
mod op;

pub use async_state::{AsyncState, AsyncStatus};
pub use op::{AsyncOp, OpFuture};
