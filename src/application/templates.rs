//! Template management use cases

use crate::domain::report::{default_templates, Template};

use super::ports::{StoreError, TemplateStore};

/// Look up the content of an optional named template.
///
/// Never fails: an absent name, an unknown name, blank content and store
/// errors all yield `None` so report generation can carry on without one.
pub async fn resolve_template<S>(store: &S, name: Option<&str>) -> Option<String>
where
    S: TemplateStore + ?Sized,
{
    let name = name?;

    match store.find_template(name).await {
        Ok(Some(template)) if !template.content.trim().is_empty() => {
            log::debug!("Using template '{name}'");
            Some(template.content)
        }
        Ok(Some(_)) => {
            log::info!("Template '{name}' is empty, continuing without it");
            None
        }
        Ok(None) => {
            log::info!("Template '{name}' not found, continuing without it");
            None
        }
        Err(e) => {
            log::warn!("Template lookup for '{name}' failed, continuing without it: {e}");
            None
        }
    }
}

/// Create, update, delete and list report templates
pub struct TemplateService<S: TemplateStore> {
    store: S,
}

impl<S: TemplateStore> TemplateService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All templates, ordered by name
    pub async fn list(&self) -> Result<Vec<Template>, StoreError> {
        self.store.list_templates().await
    }

    /// Add a new template.
    ///
    /// # Errors
    /// `Conflict` when the name is taken; the stored content is left as is.
    pub async fn create(&self, template: Template) -> Result<Template, StoreError> {
        self.store.insert_template(&template).await?;
        log::info!("Created template '{}'", template.name);
        Ok(template)
    }

    /// Replace a template's content.
    ///
    /// # Errors
    /// `NotFound` when no template has this name.
    pub async fn update(&self, name: &str, content: &str) -> Result<Template, StoreError> {
        self.store.update_template(name, content).await?;
        log::info!("Updated template '{name}'");
        Ok(Template::new(name, content))
    }

    /// Remove a template.
    ///
    /// # Errors
    /// `NotFound` when no template has this name.
    pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.store.delete_template(name).await?;
        log::info!("Deleted template '{name}'");
        Ok(())
    }

    /// Install the built-in templates into an empty store.
    /// Returns how many were added; a store that already has templates is left alone.
    pub async fn seed_defaults(&self) -> Result<usize, StoreError> {
        if !self.store.list_templates().await?.is_empty() {
            return Ok(0);
        }

        let mut seeded = 0;
        for template in default_templates() {
            match self.store.insert_template(&template).await {
                Ok(()) => seeded += 1,
                // Another process may have seeded concurrently
                Err(StoreError::Conflict(_)) => {}
                Err(e) => return Err(e),
            }
        }

        if seeded > 0 {
            log::info!("Seeded {seeded} default template(s)");
        }
        Ok(seeded)
    }
}
