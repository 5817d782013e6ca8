use std::path::PathBuf;

use indexmap::IndexMap;
use log::{debug, info};
use mcg_core::config::JavaConfig;
use mcg_core::ir::{ApiModel, Dictionary, Parameter};
use mcg_core::templates::{TemplateRoot, TemplateSet};
use mcg_core::{CodeGenerator, DecorationHooks, GeneratedFile, GeneratorError};
use minijinja::{Environment, Value, context};

use crate::decorators::{self, dictionary_value_type};
use crate::type_mapper::TypeMapper;
use crate::{JAVA_TEMPLATES, TEMPLATES};

/// IDE metadata kept when the output directory is cleaned.
const PRESERVED: [&str; 3] = [".settings", ".project", ".classpath"];

const SOURCE_DIR: &str = "src/main/java";

/// Maven project with a JAX-RS client: one class per resource, one bean per
/// model, and a home class that hands out the resource clients.
pub struct JaxrsGenerator {
    config: JavaConfig,
    templates: TemplateSet,
}

impl JaxrsGenerator {
    pub fn new(config: JavaConfig) -> Self {
        Self {
            config,
            templates: TemplateSet::new()
                .with_embedded(TEMPLATES)
                .with_embedded(JAVA_TEMPLATES),
        }
    }

    /// Look up templates in `dir` before the built-in ones.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates = self.templates.prepend(TemplateRoot::Dir(dir.into()));
        self
    }

    pub fn client_package(&self) -> String {
        format!("{}.client", self.config.package)
    }

    pub fn model_package(&self) -> String {
        format!("{}.model", self.config.package)
    }

    fn source_path(package: &str, class: &str) -> String {
        format!("{}/{}/{}.java", SOURCE_DIR, package.replace('.', "/"), class)
    }

    fn render(
        env: &Environment<'_>,
        template: &str,
        path: String,
        ctx: Value,
    ) -> Result<GeneratedFile, GeneratorError> {
        debug!("rendering {template} -> {path}");
        let content = env.get_template(template)?.render(ctx)?;
        Ok(GeneratedFile { path, content })
    }

    fn render_project(
        &self,
        env: &Environment<'_>,
        model: &ApiModel,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let pom = Self::render(
            env,
            "pom.xml.j2",
            "pom.xml".to_string(),
            context! {
                group_id => self.config.group_id.clone(),
                artifact_id => self.config.artifact_id.clone(),
                version => self.config.version.clone(),
                name => self.config.name.clone(),
                description => model.info.description.clone(),
            },
        )?;
        let gitignore = Self::render(env, "gitignore.j2", ".gitignore".to_string(), context! {})?;
        Ok(vec![pom, gitignore])
    }

    fn render_client(
        &self,
        env: &Environment<'_>,
        model: &ApiModel,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let client_package = self.client_package();
        let mut files = Vec::new();

        files.push(Self::render(
            env,
            "abstract_resource.java.j2",
            Self::source_path(&client_package, "AbstractResource"),
            context! { client_package => client_package.clone() },
        )?);

        let default_url = model
            .host
            .as_ref()
            .map(|host| format!("http://{}{}", host, model.base_path.as_deref().unwrap_or("")));
        files.push(Self::render(
            env,
            "api_home.java.j2",
            Self::source_path(&client_package, &self.config.home_class),
            context! {
                client_package => client_package.clone(),
                home_class => self.config.home_class.clone(),
                name => self.config.name.clone(),
                version => self.config.version.clone(),
                info => Value::from_serialize(&model.info),
                default_url => default_url,
                resources => Value::from_serialize(&model.resources),
            },
        )?);

        for (name, resource) in &model.resources {
            let class = decorators::resource_class(name);
            files.push(Self::render(
                env,
                "resource.java.j2",
                Self::source_path(&client_package, &class),
                context! {
                    client_package => client_package.clone(),
                    name => name.clone(),
                    resource => Value::from_serialize(resource),
                },
            )?);
        }

        let mapper = TypeMapper::new(self.model_package());
        for (class, params) in query_builder_params(model) {
            let mut imports: Vec<String> = params
                .iter()
                .flat_map(|p| mapper.java_type(&serde_json::to_value(p).unwrap_or_default()).imports)
                .collect();
            imports.sort();
            imports.dedup();

            files.push(Self::render(
                env,
                "query.java.j2",
                Self::source_path(&client_package, &class),
                context! {
                    client_package => client_package.clone(),
                    class_name => class.clone(),
                    imports => imports,
                    params => Value::from_serialize(&params),
                },
            )?);
        }

        Ok(files)
    }

    fn render_models(
        &self,
        env: &Environment<'_>,
        model: &ApiModel,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let model_package = self.model_package();
        let mut files = Vec::new();

        for (name, schema) in &model.models {
            let dictionary_value = match &schema.dictionary {
                Some(Dictionary::Typed { value, .. }) => dictionary_value_type(Some(value.as_ref())),
                _ => dictionary_value_type(None),
            };
            let class = schema
                .extensions
                .get("className")
                .and_then(serde_json::Value::as_str)
                .unwrap_or(name);

            files.push(Self::render(
                env,
                "model.java.j2",
                Self::source_path(&model_package, class),
                context! {
                    model_package => model_package.clone(),
                    name => name.clone(),
                    model => Value::from_serialize(schema),
                    dictionary_value => dictionary_value,
                },
            )?);
        }

        Ok(files)
    }
}

/// Parameters of every query-builder operation, keyed by builder class.
/// Operations sharing a builder contribute the union of their parameters.
fn query_builder_params(model: &ApiModel) -> IndexMap<String, Vec<Parameter>> {
    let mut builders: IndexMap<String, Vec<Parameter>> = IndexMap::new();

    for operation in &model.query_builders {
        let Some(class) = &operation.query_builder_name else {
            continue;
        };
        let params = builders.entry(class.clone()).or_default();
        for parameter in &operation.parameters {
            if !params.iter().any(|p| p.name == parameter.name) {
                params.push(parameter.clone());
            }
        }
    }

    builders
}

/// Each dot-separated segment must be a Java identifier.
fn validate_package(package: &str) -> Result<(), GeneratorError> {
    let valid = !package.is_empty()
        && package.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if valid {
        Ok(())
    } else {
        Err(GeneratorError::Other(format!(
            "'{package}' is not a valid Java package name"
        )))
    }
}

impl CodeGenerator for JaxrsGenerator {
    fn id(&self) -> &'static str {
        "jaxrs"
    }

    fn hooks(&self) -> DecorationHooks {
        decorators::hooks(&self.model_package())
    }

    fn preserve(&self) -> Vec<String> {
        PRESERVED.iter().map(|s| s.to_string()).collect()
    }

    fn generate(&self, model: &ApiModel) -> Result<Vec<GeneratedFile>, GeneratorError> {
        validate_package(&self.config.package)?;

        let env = self.templates.environment();
        info!(
            "rendering {} resource client(s) and {} model(s) into {}",
            model.resources.len(),
            model.models.len(),
            self.config.package
        );

        let mut files = self.render_project(&env, model)?;
        files.extend(self.render_client(&env, model)?);
        files.extend(self.render_models(&env, model)?);
        Ok(files)
    }
}
