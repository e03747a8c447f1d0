//! Transform pipeline infrastructure
//!
//!     Source files go through a fixed sequence of stages: split into tokenized lines, group
//!     the lines by indentation, then reduce and nest them into a [TranslationUnit]. Each
//!     stage implements [Runnable]; [Transform] chains stages with matching input and output
//!     types so the compiler checks the pipeline shape.
//!
//!     The common pipelines are pre-built as statics in [standard]. Most callers go through
//!     the [UnitLoader](crate::photon::loader::UnitLoader) instead of using them directly.
//!
//!     Stages share the parser's error type: every failure is a [ParseError], and a syntax
//!     error keeps its file / line context all the way out.
//!
//! [TranslationUnit]: crate::photon::ast::TranslationUnit

pub mod stages;
pub mod standard;

use crate::photon::ast::ParseError;

/// One processing stage.
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, ParseError>;
}

type RunFn<I, O> = Box<dyn Fn(I) -> Result<O, ParseError> + Send + Sync>;

/// A composed pipeline from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: RunFn<I, O>,
}

impl<I, O> Transform<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, ParseError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Feed this transform's output into `stage`.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Chain a pre-built static transform.
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> Result<O, ParseError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, ParseError> {
        Transform::run(self, input)
    }
}
