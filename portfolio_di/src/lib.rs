extern crate self as portfolio_di;

pub use portfolio_di_derive::Build;
pub use typemap::TypeMap;

mod macros;
mod typemap;

/// A container that can build services and caches the instances it has built.
pub trait Provider: Sized {
    fn cache(&mut self) -> &mut TypeMap;
}

#[diagnostic::on_unimplemented(
    message = "The type `{Self}` cannot be built using the provider `{P}`",
    note = "Add `{Self}` to the provider `{P}` or implement `Build` for `{Self}` and make sure \
            all dependencies are satisfied"
)]
pub trait Build<P: Provider>: Clone + 'static {
    fn build(provider: &mut P) -> Self;
}

pub trait Provide: Provider {
    fn provide<T: Build<Self>>(&mut self) -> T {
        T::build(self)
    }
}

impl<P: Provider> Provide for P {}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    provider! {
        TestProvider { config: TestConfig, }
    }

    #[derive(Debug, Clone)]
    struct TestConfig {
        name: &'static str,
    }

    #[derive(Debug, Clone, Build)]
    struct Service {
        config: TestConfig,
        #[state]
        state: Arc<AtomicUsize>,
    }

    #[derive(Debug, Clone, Build)]
    struct Outer {
        a: Service,
        b: Service,
    }

    #[test]
    fn provide_config() {
        // Arrange
        let mut provider = TestProvider {
            _cache: Default::default(),
            config: TestConfig { name: "test" },
        };

        // Act
        let service: Service = provider.provide();

        // Assert
        assert_eq!(service.config.name, "test");
    }

    #[test]
    fn services_are_cached() {
        // Arrange
        let mut provider = TestProvider {
            _cache: Default::default(),
            config: TestConfig { name: "test" },
        };

        // Act
        let outer: Outer = provider.provide();
        outer.a.state.fetch_add(1, Ordering::Relaxed);

        // Assert
        assert_eq!(outer.b.state.load(Ordering::Relaxed), 1);
        assert!(Arc::ptr_eq(&outer.a.state, &outer.b.state));
    }
}
