use std::path::PathBuf;

use log::info;
use mcg_core::config::HtmlConfig;
use mcg_core::ir::ApiModel;
use mcg_core::templates::{TemplateRoot, TemplateSet};
use mcg_core::{CodeGenerator, DecorationHooks, GeneratedFile, GeneratorError};
use minijinja::{Value, context};

use crate::{TEMPLATES, decorators};

/// Static asset directories a documentation site keeps between runs.
const PRESERVED: [&str; 5] = ["fonts", "styles", "css", "scripts", "js"];

/// Single-page HTML documentation generator.
pub struct HtmlGenerator {
    config: HtmlConfig,
    templates: TemplateSet,
}

impl HtmlGenerator {
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            config,
            templates: TemplateSet::new().with_embedded(TEMPLATES),
        }
    }

    /// Look up templates in `dir` before the built-in ones.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates = self.templates.prepend(TemplateRoot::Dir(dir.into()));
        self
    }
}

impl CodeGenerator for HtmlGenerator {
    fn id(&self) -> &'static str {
        "html"
    }

    fn hooks(&self) -> DecorationHooks {
        decorators::hooks()
    }

    fn preserve(&self) -> Vec<String> {
        PRESERVED.iter().map(|s| s.to_string()).collect()
    }

    fn generate(&self, model: &ApiModel) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let env = self.templates.environment();
        let tmpl = env.get_template("index.html.j2")?;

        info!("rendering documentation for {} resource(s)", model.resources.len());
        let content = tmpl.render(context! {
            name => self.config.name.clone(),
            version => self.config.version.clone(),
            info => Value::from_serialize(&model.info),
            host => model.host.clone(),
            base_path => model.base_path.clone(),
            resources => Value::from_serialize(&model.resources),
            models => Value::from_serialize(&model.models),
        })?;

        Ok(vec![GeneratedFile {
            path: "index.html".to_string(),
            content,
        }])
    }
}
