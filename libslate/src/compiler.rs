//! The external compiler interface and the keyed artifact cache.
//!
//! The native compiler that turns instruction stacks into executable code
//! is an external collaborator; this module models its seam. Compiled
//! artifacts are keyed by the identity digest, so semantically identical
//! declarations reuse the cached artifact instead of recompiling.

use crate::parser::FunctionStack;

use log::{debug, trace};
use std::collections::HashMap;

/// A compiler that consumes an instruction stack and produces an opaque
/// executable artifact.
pub trait StackCompiler {
    /// The compiled artifact handle.
    type Artifact;
    /// The compiler's failure type.
    type Error;

    /// Compiles one function.
    fn compile(&mut self, function: &FunctionStack) -> Result<Self::Artifact, Self::Error>;
}

/// Compiled artifacts keyed by function identity.
pub struct ArtifactCache<A> {
    artifacts: HashMap<String, A>,
}

impl<A> ArtifactCache<A> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            artifacts: HashMap::new(),
        }
    }

    /// The number of cached artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Whether an artifact is cached under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.artifacts.contains_key(key)
    }

    /// Fetches the artifact for `function`, compiling it on first sight.
    pub fn ensure<C>(&mut self, function: &FunctionStack, compiler: &mut C) -> Result<&A, C::Error>
    where
        C: StackCompiler<Artifact = A>,
    {
        let key = function.identity();
        if !self.artifacts.contains_key(&key) {
            debug!("compiling {} ({} instructions)", key, function.stack.len());
            let artifact = compiler.compile(function)?;
            self.artifacts.insert(key.clone(), artifact);
        } else {
            trace!("cache hit for {}", key);
        }
        Ok(&self.artifacts[&key])
    }
}

impl<A> Default for ArtifactCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_editor_line, FunctionKind};

    /// Counts invocations; "compiles" to the instruction count.
    struct CountingCompiler {
        invocations: usize,
    }

    impl StackCompiler for CountingCompiler {
        type Artifact = usize;
        type Error = ();

        fn compile(&mut self, function: &FunctionStack) -> Result<usize, ()> {
            self.invocations += 1;
            Ok(function.stack.len())
        }
    }

    #[test]
    fn identical_declarations_compile_once() {
        let mut cache = ArtifactCache::new();
        let mut compiler = CountingCompiler { invocations: 0 };

        let a = parse_editor_line("f(x)=2x", FunctionKind::RealToComplex).unwrap();
        let b = parse_editor_line("f(x)=2x", FunctionKind::RealToComplex).unwrap();

        assert_eq!(cache.ensure(&a, &mut compiler), Ok(&3));
        assert_eq!(cache.ensure(&b, &mut compiler), Ok(&3));
        assert_eq!(compiler.invocations, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_declarations_compile_separately() {
        let mut cache = ArtifactCache::new();
        let mut compiler = CountingCompiler { invocations: 0 };

        let a = parse_editor_line("f(x)=2x", FunctionKind::RealToComplex).unwrap();
        let b = parse_editor_line("f(x)=3x", FunctionKind::RealToComplex).unwrap();

        cache.ensure(&a, &mut compiler).unwrap();
        cache.ensure(&b, &mut compiler).unwrap();
        assert_eq!(compiler.invocations, 2);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&a.identity()));
        assert!(cache.contains(&b.identity()));
    }
}
