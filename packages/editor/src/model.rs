//! # Document Model
//!
//! Plain data for a BookForge project: a [`Project`] owns an ordered list of
//! [`Page`]s, each page owns an ordered list of positioned [`Component`]s.
//!
//! The JSON shape matches what the hosted store keeps in the `pages` column:
//!
//! ```json
//! {
//!   "id": "page_1",
//!   "title": "Page 1",
//!   "components": [
//!     { "id": "component_1", "type": "text", "x": 200, "y": 200,
//!       "width": 200, "height": 50, "zIndex": 1,
//!       "content": "New text", "fontSize": 16 }
//!   ]
//! }
//! ```
//!
//! Cloning a [`Project`] is a full structural copy; nothing in this module
//! hands out shared mutable state.

use serde::{Deserialize, Serialize};

/// Position every new component is placed at
pub const DEFAULT_POSITION: Position = Position { x: 200.0, y: 200.0 };

/// Offset applied to a duplicated component
pub const DUPLICATE_OFFSET: f64 = 20.0;

pub const DEFAULT_TEXT_CONTENT: &str = "New text";
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_IMAGE_URL: &str = "https://images.pexels.com/photos/256541/pexels-photo-256541.jpeg?auto=compress&cs=tinysrgb&w=300&h=200&dpr=1";
pub const DEFAULT_QR_LABEL: &str = "QR Code";
pub const DEFAULT_QR_TARGET: &str = "https://example.com";

/// Kind of book being authored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Textbook,
    Workbook,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Textbook => "textbook",
            ProjectType::Workbook => "workbook",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "textbook" => Ok(ProjectType::Textbook),
            "workbook" => Ok(ProjectType::Workbook),
            other => Err(format!("unknown project type: {}", other)),
        }
    }
}

/// Top-level authored document (a "book")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub metadata: ProjectMetadata,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// Optional descriptive fields edited from the project settings panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover preset id (`mathematics`, `science`, ...) or `upload`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// Layout template (`classic`, `modern`, `interactive`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
}

impl Project {
    /// Create a project with a single empty page, as "new project" does
    pub fn new(id: impl Into<String>, title: impl Into<String>, project_type: ProjectType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            project_type,
            metadata: ProjectMetadata::default(),
            pages: vec![Page::new(new_page_id(), page_title(1))],
        }
    }

    /// Ensure the project has at least one page and no negative geometry
    pub fn normalized(mut self) -> Self {
        if self.pages.is_empty() {
            self.pages.push(Page::new(new_page_id(), page_title(1)));
        }
        for component in self.pages.iter_mut().flat_map(|p| p.components.iter_mut()) {
            component.position = Position::new(component.position.x, component.position.y);
            component.size = Size::new(component.size.width, component.size.height);
        }
        self
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == page_id)
    }

    pub fn first_page_id(&self) -> Option<&str> {
        self.pages.first().map(|p| p.id.as_str())
    }

    /// Total number of components across all pages
    pub fn component_count(&self) -> usize {
        self.pages.iter().map(|p| p.components.len()).sum()
    }
}

/// Ordered unit of a project holding positioned components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            components: Vec::new(),
        }
    }

    pub fn component(&self, component_id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == component_id)
    }

    pub fn component_mut(&mut self, component_id: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == component_id)
    }

    /// Stacking order for the next component placed on this page
    pub fn next_z_index(&self) -> i32 {
        self.components
            .iter()
            .map(|c| c.z_index)
            .max()
            .map_or(1, |z| z.saturating_add(1))
    }
}

/// Canvas-space coordinates, always non-negative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.max(0.0),
            y: y.max(0.0),
        }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Closed set of component types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Text,
    Image,
    Qr,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Text => "text",
            ComponentKind::Image => "image",
            ComponentKind::Qr => "qr",
        }
    }

    pub fn default_size(&self) -> Size {
        match self {
            ComponentKind::Text => Size::new(200.0, 50.0),
            ComponentKind::Image | ComponentKind::Qr => Size::new(150.0, 150.0),
        }
    }

    pub fn default_props(&self) -> ComponentProps {
        match self {
            ComponentKind::Text => ComponentProps::Text {
                content: DEFAULT_TEXT_CONTENT.to_string(),
                font_size: DEFAULT_FONT_SIZE,
            },
            ComponentKind::Image => ComponentProps::Image {
                image_url: DEFAULT_IMAGE_URL.to_string(),
            },
            ComponentKind::Qr => ComponentProps::Qr {
                qr_label: DEFAULT_QR_LABEL.to_string(),
                qr_target: DEFAULT_QR_TARGET.to_string(),
            },
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ComponentKind::Text),
            "image" => Ok(ComponentKind::Image),
            "qr" => Ok(ComponentKind::Qr),
            other => Err(format!("unknown component type: {}", other)),
        }
    }
}

/// Type-keyed property bag; the variant doubles as the component type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComponentProps {
    #[serde(rename_all = "camelCase")]
    Text { content: String, font_size: f64 },
    #[serde(rename_all = "camelCase")]
    Image { image_url: String },
    #[serde(rename_all = "camelCase")]
    Qr { qr_label: String, qr_target: String },
}

impl ComponentProps {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentProps::Text { .. } => ComponentKind::Text,
            ComponentProps::Image { .. } => ComponentKind::Image,
            ComponentProps::Qr { .. } => ComponentKind::Qr,
        }
    }
}

/// Content element placed on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(flatten)]
    pub position: Position,
    #[serde(flatten)]
    pub size: Size,
    #[serde(default)]
    pub z_index: i32,
    #[serde(flatten)]
    pub props: ComponentProps,
}

impl Component {
    /// New component with the type's default size and props
    pub fn new(id: impl Into<String>, kind: ComponentKind, z_index: i32) -> Self {
        Self {
            id: id.into(),
            position: DEFAULT_POSITION,
            size: kind.default_size(),
            z_index,
            props: kind.default_props(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.props.kind()
    }

    /// Merge a partial update; props of another type are ignored
    pub fn apply_patch(&mut self, patch: &ComponentPatch) {
        if patch.x.is_some() || patch.y.is_some() {
            self.position = Position::new(
                patch.x.unwrap_or(self.position.x),
                patch.y.unwrap_or(self.position.y),
            );
        }
        if patch.width.is_some() || patch.height.is_some() {
            self.size = Size::new(
                patch.width.unwrap_or(self.size.width),
                patch.height.unwrap_or(self.size.height),
            );
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }

        match &mut self.props {
            ComponentProps::Text { content, font_size } => {
                if let Some(c) = &patch.content {
                    *content = c.clone();
                }
                if let Some(fs) = patch.font_size {
                    *font_size = fs.max(0.0);
                }
            }
            ComponentProps::Image { image_url } => {
                if let Some(url) = &patch.image_url {
                    *image_url = url.clone();
                }
            }
            ComponentProps::Qr { qr_label, qr_target } => {
                if let Some(label) = &patch.qr_label {
                    *qr_label = label.clone();
                }
                if let Some(target) = &patch.qr_target {
                    *qr_target = target.clone();
                }
            }
        }
    }
}

/// Partial component update (every field optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_target: Option<String>,
}

impl ComponentPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// Partial project-level update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
}

impl ProjectPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

impl Project {
    pub fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(project_type) = patch.project_type {
            self.project_type = project_type;
        }
        let meta = &mut self.metadata;
        if let Some(author) = &patch.author {
            meta.author = Some(author.clone());
        }
        if let Some(description) = &patch.description {
            meta.description = Some(description.clone());
        }
        if let Some(cover_type) = &patch.cover_type {
            meta.cover_type = Some(cover_type.clone());
        }
        if let Some(url) = &patch.cover_image_url {
            meta.cover_image_url = Some(url.clone());
        }
        if let Some(template) = &patch.template_type {
            meta.template_type = Some(template.clone());
        }
    }
}

/// Display title for the page at 1-based `index`
pub fn page_title(index: usize) -> String {
    format!("Page {}", index)
}

pub fn new_page_id() -> String {
    format!("page_{}", uuid::Uuid::new_v4().simple())
}

pub fn new_component_id() -> String {
    format!("component_{}", uuid::Uuid::new_v4().simple())
}
