use std::ops::Deref;

use axum_template::engine::Engine;
use snafu::ResultExt;
use tera::Tera;

use crate::config::Config;
use crate::error::{ApplicationError, LoadTemplatesSnafu};
use crate::service::ViewCounter;

pub type Templates = Engine<Tera>;

pub const INDEX_TEMPLATE: &str = "index.html";

#[derive(Clone)]
pub struct App<S> {
    pub views: ViewCounter<S>,
    pub templates: Templates,
    pub badge_color: String,
}

impl<S> Deref for App<S> {
    type Target = ViewCounter<S>;

    fn deref(&self) -> &Self::Target {
        &self.views
    }
}

pub fn templates() -> Result<Templates, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(INDEX_TEMPLATE, include_str!("../../templates/index.html"))?;
    Ok(Engine::from(tera))
}

pub fn create_app<S>(store: S, config: &Config) -> Result<App<S>, ApplicationError> {
    let templates = templates().context(LoadTemplatesSnafu)?;

    Ok(App {
        views: ViewCounter::with_cooldown(store, config.cooldown()?),
        templates,
        badge_color: config.badge_color.clone(),
    })
}
