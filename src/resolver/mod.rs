pub mod document;
pub mod engine;
pub mod error;
pub mod report;

pub use document::{ResolvedDocument, ResolvedLine};
pub use engine::{Resolver, resolve};
pub use error::ResolveError;
pub use report::{DirectiveProblem, DirectiveReport};
