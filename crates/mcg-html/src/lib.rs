pub mod decorators;
pub mod generator;

pub use generator::HtmlGenerator;

/// Templates shipped with the renderer.
pub static TEMPLATES: mcg_core::templates::EmbeddedTemplates = &[(
    "index.html.j2",
    include_str!("../templates/index.html.j2"),
)];
