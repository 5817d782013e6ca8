use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use minijinja::Environment;

/// Templates compiled into a renderer crate: `(name, source)` pairs.
pub type EmbeddedTemplates = &'static [(&'static str, &'static str)];

/// One place templates are looked up in.
#[derive(Debug, Clone)]
pub enum TemplateRoot {
    /// A directory on disk, usually a user override.
    Dir(PathBuf),
    /// Templates embedded in a renderer with `include_str!`.
    Embedded(EmbeddedTemplates),
}

impl TemplateRoot {
    fn lookup(&self, name: &str) -> io::Result<Option<String>> {
        match self {
            TemplateRoot::Dir(dir) => {
                let path = dir.join(name);
                match fs::read_to_string(&path) {
                    Ok(source) => {
                        debug!("using template override {}", path.display());
                        Ok(Some(source))
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e),
                }
            }
            TemplateRoot::Embedded(templates) => Ok(templates
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, source)| (*source).to_string())),
        }
    }
}

/// An ordered list of template roots searched first to last.
///
/// A renderer that extends another pushes its own templates before its
/// parent's, so overriding a single template never requires copying the rest.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    roots: Vec<TemplateRoot>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.roots.push(TemplateRoot::Dir(dir.into()));
        self
    }

    pub fn with_embedded(mut self, templates: EmbeddedTemplates) -> Self {
        self.roots.push(TemplateRoot::Embedded(templates));
        self
    }

    /// Put `root` ahead of every existing root.
    pub fn prepend(mut self, root: TemplateRoot) -> Self {
        self.roots.insert(0, root);
        self
    }

    pub fn roots(&self) -> &[TemplateRoot] {
        &self.roots
    }

    /// Source of the first template called `name`, searching roots in order.
    pub fn lookup(&self, name: &str) -> io::Result<Option<String>> {
        for root in &self.roots {
            if let Some(source) = root.lookup(name)? {
                return Ok(Some(source));
            }
        }
        Ok(None)
    }

    /// A minijinja environment that loads templates from this set on demand.
    pub fn environment(&self) -> Environment<'static> {
        let roots = Arc::new(self.roots.clone());

        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_loader(move |name| {
            for root in roots.iter() {
                let found = root.lookup(name).map_err(|e| {
                    minijinja::Error::new(
                        minijinja::ErrorKind::InvalidOperation,
                        format!("could not read template {name}"),
                    )
                    .with_source(e)
                })?;
                if found.is_some() {
                    return Ok(found);
                }
            }
            Ok(None)
        });
        env
    }
}

#[cfg(test)]
mod tests {
    use minijinja::context;

    use super::*;

    static BASE: EmbeddedTemplates = &[
        ("greeting.txt", "Hello {{ name }}"),
        ("footer.txt", "-- base"),
    ];

    static CHILD: EmbeddedTemplates = &[("footer.txt", "-- child")];

    #[test]
    fn test_first_root_wins() {
        let set = TemplateSet::new().with_embedded(CHILD).with_embedded(BASE);
        assert_eq!(set.lookup("footer.txt").unwrap().as_deref(), Some("-- child"));
        assert_eq!(
            set.lookup("greeting.txt").unwrap().as_deref(),
            Some("Hello {{ name }}")
        );
        assert!(set.lookup("missing.txt").unwrap().is_none());
    }

    #[test]
    fn test_directory_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("greeting.txt"), "Hi {{ name }}!").unwrap();

        let set = TemplateSet::new()
            .with_embedded(BASE)
            .prepend(TemplateRoot::Dir(dir.path().to_path_buf()));
        let env = set.environment();
        let rendered = env
            .get_template("greeting.txt")
            .unwrap()
            .render(context! { name => "Ada" })
            .unwrap();
        assert_eq!(rendered, "Hi Ada!");

        let footer = env.get_template("footer.txt").unwrap().render(()).unwrap();
        assert_eq!(footer, "-- base");
    }
}
