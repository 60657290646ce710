//! Transform chains
//!
//! A chain is the ordered list of units that turns one module's raw content
//! into bundle-ready output. Which units run is decided by the most specific
//! matching [`Rule`], or by a per-type default when no rule matches.

use std::collections::BTreeMap;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::domain::entities::ModuleContent;
use crate::domain::ports::transform::AssetMode;
use crate::domain::ports::{TransformContext, TransformUnit, UnitOutput};
use crate::domain::value_objects::{ModuleId, ModuleType};
use crate::error::{SheafError, SheafResult, TransformError};

/// Units are looked up by name; there is no ambient registration.
#[derive(Default, Clone)]
pub struct TransformRegistry {
    units: BTreeMap<String, Arc<dyn TransformUnit>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, unit: Arc<dyn TransformUnit>) -> SheafResult<()> {
        let name = unit.name().to_string();
        if self.units.contains_key(&name) {
            return Err(SheafError::DuplicateRegistration {
                kind: "transform unit",
                name,
            });
        }
        self.units.insert(name, unit);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn TransformUnit>> {
        self.units.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.units.keys()).finish()
    }
}

/// One module rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub test: Regex,
    pub exclude: Vec<Regex>,
    pub resource_query: Option<Regex>,
    /// Unit names in execution order
    pub units: Vec<String>,
    pub asset: Option<AssetMode>,
    /// Filename template for resources this rule emits
    pub filename: Option<String>,
}

impl Rule {
    pub fn new(test: Regex, units: Vec<String>) -> Self {
        Self {
            test,
            exclude: Vec::new(),
            resource_query: None,
            units,
            asset: None,
            filename: None,
        }
    }

    pub fn matches(&self, id: &ModuleId) -> bool {
        let path = id.path().to_string_lossy().replace('\\', "/");
        if !self.test.is_match(&path) || self.exclude.iter().any(|re| re.is_match(&path)) {
            return false;
        }
        match &self.resource_query {
            Some(re) => id.query().is_some_and(|q| re.is_match(q)),
            None => true,
        }
    }

    fn specificity(&self) -> (bool, usize) {
        (self.resource_query.is_some(), self.test.as_str().len())
    }
}

/// Unit names used when no rule matches a module.
pub fn default_units(module_type: ModuleType, id: &ModuleId) -> Vec<&'static str> {
    match module_type {
        ModuleType::Script => vec!["define", "esm"],
        ModuleType::Template => vec!["component", "define", "esm"],
        ModuleType::Style => vec!["style-imports", "style-extract"],
        ModuleType::Image | ModuleType::Font => vec!["asset"],
        ModuleType::Raw if id.extension().eq_ignore_ascii_case(".json") => vec!["json"],
        ModuleType::Raw => vec!["raw"],
    }
}

/// Rules plus the registry their unit names refer to.
#[derive(Debug, Clone)]
pub struct TransformChain {
    registry: TransformRegistry,
    rules: Vec<Rule>,
}

impl TransformChain {
    /// Fails if a rule names an unregistered unit.
    pub fn new(registry: TransformRegistry, rules: Vec<Rule>) -> SheafResult<Self> {
        for name in rules.iter().flat_map(|r| r.units.iter()) {
            if registry.get(name).is_none() {
                return Err(SheafError::UnknownUnit(name.clone()));
            }
        }
        Ok(Self { registry, rules })
    }

    /// The most specific matching rule. A `resource_query` condition beats
    /// none, then the longer `test` pattern; ties go to the earlier rule.
    pub fn select(&self, id: &ModuleId) -> Option<&Rule> {
        let mut best: Option<&Rule> = None;
        for rule in self.rules.iter().filter(|r| r.matches(id)) {
            match best {
                Some(b) if rule.specificity() <= b.specificity() => {}
                _ => best = Some(rule),
            }
        }
        best
    }

    /// Run the chain for one module. `base` carries the build-wide context;
    /// the selected rule fills in asset mode and filename.
    pub fn run(
        &self,
        raw: ModuleContent,
        base: &TransformContext<'_>,
    ) -> Result<UnitOutput, TransformError> {
        let rule = self.select(base.module);
        let mut ctx = base.clone();
        let names: Vec<&str> = match rule {
            Some(rule) => {
                if let Some(mode) = rule.asset {
                    ctx.asset_mode = mode;
                }
                ctx.asset_filename = rule.filename.as_deref();
                rule.units.iter().map(String::as_str).collect()
            }
            None => default_units(ctx.module_type, ctx.module),
        };

        let mut output = UnitOutput::new(raw);
        for name in names {
            let Some(unit) = self.registry.get(name) else {
                return Err(self.failure(name, &ctx, "unit is not registered".to_string()));
            };
            if !unit.accepts(ctx.module_type) {
                debug!(
                    unit = name,
                    module = %ctx.display_name(),
                    module_type = %ctx.module_type,
                    "skipping unit that does not accept module type"
                );
                continue;
            }
            let step = unit
                .run(output.content, &ctx)
                .map_err(|cause| self.failure(name, &ctx, cause.0))?;
            output.content = step.content;
            output.side_artifacts.extend(step.side_artifacts);
            output.dependencies.extend(step.dependencies);
            if step.inline_url.is_some() {
                output.inline_url = step.inline_url;
            }
        }
        Ok(output)
    }

    fn failure(&self, unit: &str, ctx: &TransformContext<'_>, cause: String) -> TransformError {
        TransformError {
            unit: unit.to_string(),
            module: ctx.display_name(),
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Dependency, SideArtifact};
    use crate::domain::ports::{UnitFailure, UnitResult};
    use crate::domain::value_objects::Mode;
    use std::path::Path;

    struct Append(&'static str, ModuleType);

    impl TransformUnit for Append {
        fn name(&self) -> &str {
            self.0
        }

        fn accepts(&self, module_type: ModuleType) -> bool {
            module_type == self.1
        }

        fn run(&self, input: ModuleContent, _ctx: &TransformContext<'_>) -> UnitResult {
            let text = input.into_text()?;
            Ok(UnitOutput::text(format!("{}+{}", text, self.0))
                .with_dependencies(vec![Dependency::new(format!("./{}", self.0))])
                .with_artifact(SideArtifact::Stylesheet {
                    text: self.0.to_string(),
                }))
        }
    }

    struct Fail;

    impl TransformUnit for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        fn accepts(&self, _: ModuleType) -> bool {
            true
        }

        fn run(&self, _: ModuleContent, _: &TransformContext<'_>) -> UnitResult {
            Err(UnitFailure::from("unexpected token"))
        }
    }

    fn registry() -> TransformRegistry {
        let mut registry = TransformRegistry::new();
        registry
            .register(Arc::new(Append("a", ModuleType::Script)))
            .unwrap();
        registry
            .register(Arc::new(Append("b", ModuleType::Script)))
            .unwrap();
        registry
            .register(Arc::new(Append("css", ModuleType::Style)))
            .unwrap();
        registry.register(Arc::new(Fail)).unwrap();
        registry
    }

    fn rule(test: &str, units: &[&str]) -> Rule {
        Rule::new(
            Regex::new(test).unwrap(),
            units.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn run(chain: &TransformChain, id: &ModuleId) -> Result<UnitOutput, TransformError> {
        let define = BTreeMap::new();
        let ctx = TransformContext {
            module: id,
            module_type: ModuleType::infer(id.path()),
            root: Path::new("/p"),
            mode: Mode::Development,
            asset_mode: AssetMode::Auto,
            asset_filename: None,
            inline_limit: 8192,
            define: &define,
        };
        chain.run(ModuleContent::Text("src".to_string()), &ctx)
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = registry();
        let err = registry
            .register(Arc::new(Append("a", ModuleType::Raw)))
            .unwrap_err();
        assert!(matches!(err, SheafError::DuplicateRegistration { .. }));
    }

    #[test]
    fn unknown_unit_in_rule_is_rejected() {
        let err = TransformChain::new(registry(), vec![rule(r"\.js$", &["nope"])]).unwrap_err();
        assert!(matches!(err, SheafError::UnknownUnit(name) if name == "nope"));
    }

    #[test]
    fn threads_output_and_concatenates_in_unit_order() {
        let chain = TransformChain::new(registry(), vec![rule(r"\.js$", &["a", "b"])]).unwrap();
        let out = run(&chain, &ModuleId::new("/p/src/main.js")).unwrap();
        assert_eq!(out.content.as_text(), Some("src+a+b"));
        let specs: Vec<&str> = out.dependencies.iter().map(|d| d.specifier.as_str()).collect();
        assert_eq!(specs, vec!["./a", "./b"]);
        assert_eq!(out.side_artifacts.len(), 2);
    }

    #[test]
    fn units_that_do_not_accept_the_type_are_skipped() {
        let chain =
            TransformChain::new(registry(), vec![rule(r"\.js$", &["a", "css", "b"])]).unwrap();
        let out = run(&chain, &ModuleId::new("/p/src/main.js")).unwrap();
        assert_eq!(out.content.as_text(), Some("src+a+b"));
    }

    #[test]
    fn failing_unit_names_unit_and_module() {
        let chain = TransformChain::new(registry(), vec![rule(r"\.js$", &["a", "fail"])]).unwrap();
        let err = run(&chain, &ModuleId::new("/p/src/main.js")).unwrap_err();
        assert_eq!(err.unit, "fail");
        assert_eq!(err.module, "src/main.js");
        assert_eq!(err.cause, "unexpected token");
    }

    #[test]
    fn resource_query_rule_beats_plain_rule() {
        let mut queried = rule(r"\.svg$", &["b"]);
        queried.resource_query = Some(Regex::new("vue").unwrap());
        let chain = TransformChain::new(
            registry(),
            vec![rule(r"\.(png|svg)$", &["a"]), queried],
        )
        .unwrap();

        let plain = ModuleId::new("/p/icon.svg");
        let with_query = ModuleId::with_query("/p/icon.svg", Some("vue".to_string()));
        assert_eq!(chain.select(&plain).unwrap().units, vec!["a"]);
        assert_eq!(chain.select(&with_query).unwrap().units, vec!["b"]);
    }

    #[test]
    fn longer_test_wins_then_config_order() {
        let chain = TransformChain::new(
            registry(),
            vec![
                rule(r"\.js$", &["a"]),
                rule(r"vendor/.*\.js$", &["b"]),
                rule(r"vendor/.*\.js$", &["fail"]),
            ],
        )
        .unwrap();
        assert_eq!(
            chain.select(&ModuleId::new("/p/vendor/x.js")).unwrap().units,
            vec!["b"]
        );
        assert_eq!(
            chain.select(&ModuleId::new("/p/src/x.js")).unwrap().units,
            vec!["a"]
        );
    }

    #[test]
    fn exclude_removes_a_match() {
        let mut r = rule(r"\.js$", &["a"]);
        r.exclude = vec![Regex::new("node_modules").unwrap()];
        assert!(r.matches(&ModuleId::new("/p/src/a.js")));
        assert!(!r.matches(&ModuleId::new("/p/node_modules/x/a.js")));
    }

    #[test]
    fn default_chains_per_type() {
        let json = ModuleId::new("/p/data.json");
        assert_eq!(default_units(ModuleType::Raw, &json), vec!["json"]);
        assert_eq!(
            default_units(ModuleType::Style, &ModuleId::new("/p/a.css")),
            vec!["style-imports", "style-extract"]
        );
    }
}
