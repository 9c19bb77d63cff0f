//! Resolve YAML documents whose lines carry trailing `# [<expression>]`
//! directives.
//!
//! A line with a directive is kept only when its expression holds for the
//! active [`Definitions`]; every other line is kept as is. The surviving text
//! is parsed into a [`serde_yaml::Value`].
//!
//! ```no_run
//! use ycond::{Definitions, resolve};
//!
//! let definitions: Definitions = ["cpp"].into_iter().collect();
//! let value = resolve("__api__.yaml", &definitions)?;
//! # Ok::<(), ycond::ResolveError>(())
//! ```

pub mod config;
pub mod definitions;
pub mod directive;
pub mod output;
pub mod resolver;

pub use config::Config;
pub use definitions::Definitions;
pub use directive::{Directive, DirectiveMatcher, Expr, ExpressionError};
pub use resolver::{DirectiveReport, ResolveError, ResolvedDocument, Resolver, resolve};
