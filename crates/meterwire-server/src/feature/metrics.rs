use std::sync::Arc;

use meterwire_core::naming::{choose_name, EXCEPTIONS_SUFFIX};
use meterwire_core::{MetricRegistry, ResourceInfo, Result, SharedMetricRegistries};

use super::{DynamicFeature, FeatureContext};
use crate::intercept::{ExceptionMeteredInterceptor, MeteredInterceptor, TimedInterceptor};

/// Binds timers, meters and exception meters declared on resource methods.
#[derive(Clone)]
pub struct MetricsFeature {
    registry: Arc<MetricRegistry>,
}

impl MetricsFeature {
    pub fn new(registry: Arc<MetricRegistry>) -> Self {
        Self { registry }
    }

    /// Use the process-wide registry called `registry_name`.
    pub fn shared(registry_name: &str) -> Self {
        Self::new(SharedMetricRegistries::get_or_create(registry_name))
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }
}

impl DynamicFeature for MetricsFeature {
    fn configure(&self, resource: &ResourceInfo, ctx: &mut FeatureContext) -> Result<()> {
        if let Some(decl) = resource.timed_decl() {
            let name = choose_name(&decl.name, decl.absolute, resource, &[]);
            let timer = self.registry.timer(&name)?;
            tracing::debug!(metric = %name, "timer bound");
            ctx.register_writer(Arc::new(TimedInterceptor::new(timer)));
        }

        if let Some(decl) = resource.metered_decl() {
            let name = choose_name(&decl.name, decl.absolute, resource, &[]);
            let meter = self.registry.meter(&name)?;
            tracing::debug!(metric = %name, "meter bound");
            ctx.register_writer(Arc::new(MeteredInterceptor::new(meter)));
        }

        if let Some(decl) = resource.exception_metered_decl() {
            let name = choose_name(&decl.name, decl.absolute, resource, &[EXCEPTIONS_SUFFIX]);
            let meter = self.registry.meter(&name)?;
            tracing::debug!(metric = %name, cause = decl.cause.type_name(), "exception meter bound");
            ctx.register(Arc::new(ExceptionMeteredInterceptor::new(meter, decl.cause)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use meterwire_core::{ClientCode, ExceptionMetered, Metered, Timed};

    #[test]
    fn binds_one_interceptor_per_declaration() {
        let registry = Arc::new(MetricRegistry::new());
        let feature = MetricsFeature::new(registry.clone());
        let info = ResourceInfo::new("app.Users", "list")
            .timed(Timed::default())
            .metered(Metered::absolute("users.hits"))
            .exception_metered(ExceptionMetered::caused_by::<io::Error>());

        let mut ctx = FeatureContext::new();
        feature.configure(&info, &mut ctx).unwrap();
        let chain = ctx.into_chain();

        assert_eq!(chain.writer_count(), 3);
        assert_eq!(chain.reader_count(), 1);
        assert_eq!(
            registry.names(),
            vec!["app.Users.list", "app.Users.list.exceptions", "users.hits"]
        );
    }

    #[test]
    fn explicit_names_are_relative_unless_absolute() {
        let registry = Arc::new(MetricRegistry::new());
        let feature = MetricsFeature::new(registry.clone());
        let info = ResourceInfo::new("app.Users", "list")
            .timed(Timed::named("latency"))
            .metered(Metered::named("hits"))
            .exception_metered(
                ExceptionMetered::caused_by::<io::Error>().with_name("users.failures", true),
            );

        feature.configure(&info, &mut FeatureContext::new()).unwrap();

        assert_eq!(
            registry.names(),
            vec!["app.Users.hits", "app.Users.latency", "users.failures"]
        );
    }

    #[test]
    fn undeclared_method_binds_nothing() {
        let registry = Arc::new(MetricRegistry::new());
        let feature = MetricsFeature::new(registry.clone());

        let mut ctx = FeatureContext::new();
        feature
            .configure(&ResourceInfo::new("app.Users", "plain"), &mut ctx)
            .unwrap();

        assert!(ctx.into_chain().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn conflicting_names_fail_configuration() {
        let registry = Arc::new(MetricRegistry::new());
        let feature = MetricsFeature::new(registry);
        let info = ResourceInfo::new("app.Users", "list")
            .timed(Timed::absolute("hits"))
            .metered(Metered::absolute("hits"));

        let err = feature.configure(&info, &mut FeatureContext::new()).unwrap_err();
        assert_eq!(err.client_code(), ClientCode::Conflict);
    }

    #[test]
    fn shared_constructor_uses_named_registry() {
        let feature = MetricsFeature::shared("metrics-feature-shared-test");
        let same = SharedMetricRegistries::get_or_create("metrics-feature-shared-test");
        assert!(Arc::ptr_eq(feature.registry(), &same));
    }
}
