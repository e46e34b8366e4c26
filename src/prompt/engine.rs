use tera::{Context, Tera};

/// Tera-backed registry of named prompt templates.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create an engine with no templates (nothing is read from disk).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register or replace a template.
    pub fn add_template(&mut self, name: &str, content: &str) -> anyhow::Result<()> {
        self.tera.add_raw_template(name, content)?;
        Ok(())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a registered template. Unknown variables are an error.
    pub fn render(&self, name: &str, context: &Context) -> anyhow::Result<String> {
        Ok(self.tera.render(name, context)?)
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}
