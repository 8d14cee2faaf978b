//! # shelike-rs
//!
//! Unix-pipe-style chaining of text processing stages.
//!
//! Values flow left to right through named stages: sources produce a
//! sequence, filters and maps transform it lazily, sinks and collectors
//! consume it.
//!
//! ## Overview
//!
//! Every stage declares its parameters, the first of which is always the
//! incoming sequence. The same stage serves two roles:
//! - **Called with every argument**: it runs immediately and returns its result.
//! - **Called with one argument short**: it returns a [`Partial`] binding that
//!   [`chain`] later completes with the upstream sequence.
//!
//! Anything shorter than that is an arity error.
//!
//! ## Example
//!
//! ```
//! use shelike_rs::{Pipeline, Value, collect, stages};
//!
//! // "lambda" | enumerate | asdict
//! let map = Pipeline::new("lambda")
//!     .through(&collect::ENUMERATE)
//!     .through(&collect::ASDICT)
//!     .finish()
//!     .unwrap();
//!
//! assert_eq!(
//!     map.as_value().unwrap().to_string(),
//!     "{0: 'l', 1: 'a', 2: 'm', 3: 'b', 4: 'd', 5: 'a'}"
//! );
//!
//! // names starting with "__r", collected into a list
//! let names = Pipeline::new(vec!["__radd__", "__add__", "__rsub__"])
//!     .through(stages::grep("__r").unwrap())
//!     .through(&collect::ASLIST)
//!     .finish()
//!     .unwrap();
//!
//! assert_eq!(names.as_value(), Some(&Value::from(vec!["__radd__", "__rsub__"])));
//! ```

pub mod arg;
pub mod binding;
pub mod collect;
pub mod error;
pub mod flow;
pub mod pipeline;
pub mod stage;
pub mod stages;
pub mod value;

pub use arg::{Arg, Args, Bound, Func, func};
pub use binding::Partial;
pub use error::{PipeError, Result};
pub use flow::{Flow, Sequence};
pub use pipeline::{Pipeline, Target, chain};
pub use stage::{Applied, Param, Prepare, Stage, Transform};
pub use value::{Dict, Value};
