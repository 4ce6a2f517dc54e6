use std::any::Any;

use geojson::Feature;
use log::debug;

use crate::draw::{
    Entity, EntityStore, RenderOptions, StyleDefaults, Surface, TextEntity, render_entity,
};
use crate::geodesy::LatLng;
use crate::input::tool::{Tool, ToolContext, draw_committed};
use crate::interchange::codec;

/// Places a text label.
///
/// A click opens a one-shot draft; the embedding form fills in the text through
/// [`set_draft_text`](TextTool::set_draft_text) and `finish` commits it unless the
/// text is blank.
#[derive(Debug, Default)]
pub struct TextTool {
    draft: Option<TextEntity>,
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&TextEntity> {
        self.draft.as_ref()
    }

    /// Replaces the draft's text. Returns false without a draft.
    pub fn set_draft_text(&mut self, text: &str) -> bool {
        match &mut self.draft {
            Some(draft) => {
                draft.text = text.to_string();
                true
            }
            None => false,
        }
    }
}

impl Tool for TextTool {
    /// Opens a draft, or moves the open one to the new position.
    fn add(&mut self, at: LatLng, ctx: &mut ToolContext<'_>) {
        match &mut self.draft {
            Some(draft) => draft.position = at,
            None => {
                self.draft = Some(TextEntity {
                    position: at,
                    text: String::new(),
                    style: ctx.styles.text,
                });
            }
        }
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(draft) = self.draft.take() else {
            return;
        };
        if draft.text.trim().is_empty() {
            debug!("Discarding blank text draft");
            return;
        }
        let id = ctx.store.allocate_id();
        ctx.commit(id, Entity::Text(draft));
    }

    fn cancel(&mut self) {
        self.draft = None;
    }

    fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    fn draw(
        &self,
        owner: &str,
        store: &EntityStore,
        surface: &mut dyn Surface,
        options: &RenderOptions,
    ) {
        draw_committed(owner, store, surface, options);
        if let Some(draft) = &self.draft {
            render_entity(surface, &Entity::Text(draft.clone()), options);
        }
    }

    fn accepts(&self, feature: &Feature) -> bool {
        codec::is_text(feature)
    }

    fn import(
        &mut self,
        feature: &Feature,
        owner: &str,
        store: &mut EntityStore,
        styles: &StyleDefaults,
    ) -> bool {
        match codec::decode_text(feature, &styles.text) {
            Some(text) => {
                store.push(owner, Entity::Text(text));
                true
            }
            None => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
