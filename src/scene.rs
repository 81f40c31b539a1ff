use serde::{Serialize, Deserialize};
use crate::error::Result;
use crate::objects::Shape;

pub type ObjectId = u32;

pub const SCENE_VERSION: &str = "1.0";

#[derive(Clone, PartialEq, Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub shape: Shape,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundImage {
    /// `data:` URL of the picture.
    pub src: String,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, clockwise.
    #[serde(default)]
    pub angle: f64,
}

impl BackgroundImage {
    pub fn new(src: String, width: f64, height: f64) -> Self {
        BackgroundImage { src, left: 0.0, top: 0.0, width, height, angle: 0.0 }
    }

    /// A background whose pixel size is not known yet.
    pub fn r#unsized(src: String) -> Self {
        BackgroundImage::new(src, 0.0, 0.0)
    }

    pub fn has_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn rotate_quarter(&mut self) {
        self.angle = (self.angle + 90.0) % 360.0;
    }
}

/// Wire format of an exported scene.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub objects: Vec<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<BackgroundImage>,
}

#[derive(Clone, Debug)]
pub struct Scene {
    objects: Vec<SceneObject>,
    next_id: ObjectId,
    active_id: Option<ObjectId>,
    background: Option<BackgroundImage>,
    render_requested: bool,
}

impl Scene {
    pub fn new() -> Scene {
        Scene {
            objects: Vec::new(),
            next_id: 1,
            active_id: None,
            background: None,
            render_requested: false,
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&Shape> {
        self.objects.iter().find(|o| o.id == id).map(|o| &o.shape)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Shape> {
        self.objects.iter_mut().find(|o| o.id == id).map(|o| &mut o.shape)
    }

    pub fn add(&mut self, shape: Shape) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(SceneObject { id, shape });
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Shape> {
        let pos = self.objects.iter().position(|o| o.id == id)?;
        if self.active_id == Some(id) {
            self.active_id = None;
        }
        Some(self.objects.remove(pos).shape)
    }

    pub fn active_id(&self) -> Option<ObjectId> {
        self.active_id
    }

    pub fn set_active(&mut self, id: Option<ObjectId>) {
        self.active_id = id.filter(|id| self.get(*id).is_some());
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn background_mut(&mut self) -> Option<&mut BackgroundImage> {
        self.background.as_mut()
    }

    pub fn set_background(&mut self, background: Option<BackgroundImage>) {
        self.background = background;
        self.render_requested = true;
    }

    /// Fills in the size of a background the decoder could not probe.
    /// Returns true when the size changed.
    pub fn size_background(&mut self, width: f64, height: f64) -> bool {
        match self.background.as_mut() {
            Some(bg) if !bg.has_size() && width > 0.0 && height > 0.0 => {
                bg.width = width;
                bg.height = height;
                self.render_requested = true;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.active_id = None;
        self.background = None;
        self.render_requested = true;
    }

    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    /// Returns whether a redraw was requested since the last call, and resets the flag.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            version: SCENE_VERSION.to_string(),
            objects: self.objects.iter().map(|o| o.shape.clone()).collect(),
            background_image: self.background.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    pub fn from_document(doc: SceneDocument) -> Scene {
        let mut scene = Scene::new();
        for mut shape in doc.objects {
            shape.normalize();
            scene.add(shape);
        }
        scene.background = doc.background_image;
        scene.render_requested = true;
        scene
    }

    pub fn from_json(json: &str) -> Result<Scene> {
        let doc: SceneDocument = serde_json::from_str(json)?;
        Ok(Scene::from_document(doc))
    }

    /// Replaces the whole scene. On a parse error `self` is left as it was.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let loaded = Scene::from_json(json)?;
        *self = loaded;
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}
