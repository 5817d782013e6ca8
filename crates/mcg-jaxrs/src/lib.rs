pub mod decorators;
pub mod generator;
pub mod type_mapper;

pub use generator::JaxrsGenerator;

use mcg_core::templates::EmbeddedTemplates;

/// Templates for any Java project: the Maven build, beans, and ignore file.
pub static JAVA_TEMPLATES: EmbeddedTemplates = &[
    ("java/pom.xml.j2", include_str!("../templates/java/pom.xml.j2")),
    ("gitignore.j2", include_str!("../templates/java/gitignore.j2")),
    ("model.java.j2", include_str!("../templates/java/model.java.j2")),
];

/// JAX-RS client templates, searched before [`JAVA_TEMPLATES`].
pub static TEMPLATES: EmbeddedTemplates = &[
    ("pom.xml.j2", include_str!("../templates/jaxrs/pom.xml.j2")),
    (
        "abstract_resource.java.j2",
        include_str!("../templates/jaxrs/abstract_resource.java.j2"),
    ),
    ("api_home.java.j2", include_str!("../templates/jaxrs/api_home.java.j2")),
    ("resource.java.j2", include_str!("../templates/jaxrs/resource.java.j2")),
    ("query.java.j2", include_str!("../templates/jaxrs/query.java.j2")),
];
