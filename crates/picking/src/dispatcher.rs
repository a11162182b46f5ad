use folio_common::Ray;
use folio_scene::SceneGraph;
use glam::Vec2;

use crate::registry::InteractableRegistry;

/// Pointer cursor shown by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// Outward notifications for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ShowInfo {
        title: String,
        body: String,
        link: Option<String>,
    },
    HideInfo,
    OpenLink(String),
    Cursor(CursorStyle),
}

impl std::fmt::Display for UiEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiEvent::ShowInfo { title, link, .. } => match link {
                Some(link) => write!(f, "show-info \"{title}\" link={link}"),
                None => write!(f, "show-info \"{title}\""),
            },
            UiEvent::HideInfo => write!(f, "hide-info"),
            UiEvent::OpenLink(url) => write!(f, "open-link {url}"),
            UiEvent::Cursor(style) => write!(f, "cursor {style:?}"),
        }
    }
}

/// Pointer position and what it currently rests on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    /// Normalized device coordinates, each in `[-1, 1]`.
    pub ndc: Vec2,
    /// Recomputed every frame.
    pub hovered: Option<String>,
}

/// Hover tracking and click dispatch over an [`InteractableRegistry`].
#[derive(Debug, Clone, Default)]
pub struct PickingDispatcher {
    registry: InteractableRegistry,
    pointer: PointerState,
    cursor: CursorStyle,
    events: Vec<UiEvent>,
}

impl PickingDispatcher {
    pub fn new(registry: InteractableRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &InteractableRegistry {
        &self.registry
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn hovered(&self) -> Option<&str> {
        self.pointer.hovered.as_deref()
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer.ndc = ndc;
    }

    /// Re-run the hover test with this frame's pointer ray.
    pub fn update(&mut self, graph: &SceneGraph, ray: &Ray) {
        let hit = self.registry.pick(graph, ray);
        let style = if hit.is_some() {
            CursorStyle::Pointer
        } else {
            CursorStyle::Default
        };
        let hovered = hit.map(|h| h.name);
        if hovered != self.pointer.hovered {
            tracing::debug!(hovered = ?hovered, "hover changed");
        }
        self.pointer.hovered = hovered;
        if style != self.cursor {
            self.cursor = style;
            self.events.push(UiEvent::Cursor(style));
        }
    }

    /// Act on a click against the current hover result.
    pub fn click(&mut self) {
        let Some(name) = self.pointer.hovered.as_deref() else {
            tracing::trace!("click on empty space");
            return;
        };
        let Some(entry) = self.registry.get(name) else {
            tracing::warn!(name, "click on unregistered target ignored");
            return;
        };
        if let Some(url) = &entry.link {
            tracing::info!(name, url = %url, "opening direct link");
            self.events.push(UiEvent::OpenLink(url.clone()));
        } else if let Some(info) = &entry.info {
            tracing::info!(name, title = %info.title, "showing info");
            self.events.push(UiEvent::ShowInfo {
                title: info.title.clone(),
                body: info.body.clone(),
                link: info.link.clone(),
            });
        } else {
            tracing::warn!(name, "interactable has no content, click ignored");
        }
    }

    pub fn close_info(&mut self) {
        self.events.push(UiEvent::HideInfo);
    }

    /// Take the events raised since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }
}
