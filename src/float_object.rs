use anyhow::Result;
use image::RgbaImage;

use crate::Point2D;
use crate::assets::{self, LoadedImage};
use crate::hand::Handedness;

/// Which diagonal pair of corners is driving an active resize. Bookkeeping
/// only; the value never changes the resize math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    Left,
    Right,
}

/// A user-manipulable image overlay. The only entity with cross-frame
/// lifetime; all interaction state (ownership, grab offset, resize arming)
/// lives here rather than in any hand-indexed structure, because hand list
/// order is not stable across ticks.
#[derive(Debug, Clone)]
pub struct FloatObject {
    pixels: RgbaImage,
    has_alpha: bool,
    source_path: String,
    /// Logical top-left in frame coordinates. The compositor's edge-clamped
    /// draw position is derived per frame and never written back here.
    position: Point2D,
    drag_owner: Option<Handedness>,
    grab_offset: Point2D,
    resize_direction: Option<ResizeDirection>,
    visible: bool,
}

impl FloatObject {
    /// Import an image: decode from `path`, scale to `width` preserving
    /// aspect ratio, detect alpha by channel count.
    pub fn from_file(path: &str, width: u32) -> Result<Self> {
        let LoadedImage { pixels, has_alpha } = assets::load_image_scaled(path, width)?;
        Ok(FloatObject {
            pixels,
            has_alpha,
            source_path: String::from(path),
            position: (0., 0.),
            drag_owner: None,
            grab_offset: (0., 0.),
            resize_direction: None,
            visible: true,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn set_position(&mut self, position: Point2D) {
        self.position = position;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn contains(&self, cursor: &Point2D) -> bool {
        let (x, y) = self.position;
        let (cx, cy) = *cursor;
        cx >= x && cx <= x + self.width() as f32 && cy >= y && cy <= y + self.height() as f32
    }

    pub fn drag_owner(&self) -> Option<Handedness> {
        self.drag_owner
    }

    pub fn grab_offset(&self) -> Point2D {
        self.grab_offset
    }

    pub fn set_grab_offset(&mut self, offset: Point2D) {
        self.grab_offset = offset;
    }

    /// Take (or transfer) drag ownership for `handedness`.
    pub fn grab(&mut self, handedness: Handedness, grab_offset: Point2D) {
        self.drag_owner = Some(handedness);
        self.grab_offset = grab_offset;
        self.resize_direction = None;
    }

    /// Release on gesture loss: ownership and any armed resize go together.
    pub fn release(&mut self) {
        self.drag_owner = None;
        self.resize_direction = None;
    }

    pub fn resize_direction(&self) -> Option<ResizeDirection> {
        self.resize_direction
    }

    pub fn is_resizing(&self) -> bool {
        self.resize_direction.is_some()
    }

    pub fn arm_resize(&mut self, direction: ResizeDirection) {
        // An armed resize implies an owning hand.
        debug_assert!(self.drag_owner.is_some());
        self.resize_direction = Some(direction);
    }

    pub fn disarm_resize(&mut self) {
        self.resize_direction = None;
    }

    /// Swap in a freshly decoded pixel buffer (resize commit).
    pub fn replace_pixels(&mut self, loaded: LoadedImage) {
        self.pixels = loaded.pixels;
        self.has_alpha = loaded.has_alpha;
    }
}

/// Creation-ordered store of float objects. Creation order doubles as
/// z-order: the most recently created object is topmost.
#[derive(Default)]
pub struct FloatObjectStore {
    objects: Vec<FloatObject>,
}

impl FloatObjectStore {
    pub fn new() -> Self {
        FloatObjectStore {
            objects: Vec::new(),
        }
    }

    pub fn add(&mut self, object: FloatObject) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Back-to-front iteration for the compositor.
    pub fn iter(&self) -> impl Iterator<Item = &FloatObject> {
        self.objects.iter()
    }

    pub fn get(&self, index: usize) -> &FloatObject {
        &self.objects[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut FloatObject {
        &mut self.objects[index]
    }

    /// Topmost object whose bounding box contains `cursor`: scan
    /// most-recently-created first, first match wins.
    pub fn topmost_under(&self, cursor: &Point2D) -> Option<usize> {
        self.objects
            .iter()
            .enumerate()
            .rev()
            .find(|(_, o)| o.contains(cursor))
            .map(|(i, _)| i)
    }

    pub fn index_owned_by(&self, handedness: Handedness) -> Option<usize> {
        self.objects
            .iter()
            .position(|o| o.drag_owner() == Some(handedness))
    }

    /// Clear ownership (and any armed resize) held by `handedness`.
    pub fn release_owned_by(&mut self, handedness: Handedness) {
        for object in self
            .objects
            .iter_mut()
            .filter(|o| o.drag_owner() == Some(handedness))
        {
            object.release();
        }
    }

    /// Synchronous, non-recoverable removal. Any ownership state dies with
    /// the object.
    pub fn remove(&mut self, index: usize) -> FloatObject {
        self.objects.remove(index)
    }
}

#[cfg(test)]
pub mod test_store {
    //! Store/object builders backed by real temporary image files, shared by
    //! the interaction and compositor tests.

    use tempfile::TempDir;

    use super::*;
    use crate::assets::test_images;

    /// An opaque object of the given size at `position`, backed by a real
    /// PNG on disk (so resize commits can re-decode it).
    pub fn object_at(dir: &TempDir, name: &str, width: u32, height: u32, position: Point2D) -> FloatObject {
        let path = dir.path().join(name);
        test_images::write_rgb_png(&path, width, height);
        let mut object = FloatObject::from_file(path.to_str().unwrap(), width).unwrap();
        object.set_position(position);
        object
    }

    pub fn alpha_object_at(
        dir: &TempDir,
        name: &str,
        width: u32,
        height: u32,
        position: Point2D,
    ) -> FloatObject {
        let path = dir.path().join(name);
        test_images::write_rgba_png(&path, width, height);
        let mut object = FloatObject::from_file(path.to_str().unwrap(), width).unwrap();
        object.set_position(position);
        object
    }
}

#[cfg(test)]
mod tests {
    use super::test_store::object_at;
    use super::*;

    #[test]
    fn test_import_keeps_requested_width() {
        let dir = tempfile::tempdir().unwrap();
        let object = object_at(&dir, "a.png", 100, 50, (0., 0.));
        assert_eq!((object.width(), object.height()), (100, 50));
        assert!(!object.has_alpha());
        assert!(object.visible());
    }

    #[test]
    fn test_hit_test_prefers_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FloatObjectStore::new();
        store.add(object_at(&dir, "a.png", 100, 50, (10., 10.)));
        store.add(object_at(&dir, "b.png", 100, 50, (50., 20.)));

        // (60, 30) lies inside both boxes; B was created last.
        assert_eq!(store.topmost_under(&(60., 30.)), Some(1));
        // Only A covers (15, 15).
        assert_eq!(store.topmost_under(&(15., 15.)), Some(0));
        assert_eq!(store.topmost_under(&(500., 500.)), None);
    }

    #[test]
    fn test_release_clears_owner_and_resize() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FloatObjectStore::new();
        store.add(object_at(&dir, "a.png", 100, 50, (10., 10.)));

        store.get_mut(0).grab(Handedness::Left, (5., 5.));
        store.get_mut(0).arm_resize(ResizeDirection::Right);
        assert_eq!(store.index_owned_by(Handedness::Left), Some(0));

        store.release_owned_by(Handedness::Left);
        assert_eq!(store.index_owned_by(Handedness::Left), None);
        assert!(!store.get(0).is_resizing());
    }

    #[test]
    fn test_remove_is_immediate() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FloatObjectStore::new();
        store.add(object_at(&dir, "a.png", 100, 50, (10., 10.)));
        store.get_mut(0).grab(Handedness::Right, (0., 0.));

        store.remove(0);
        assert!(store.is_empty());
        assert_eq!(store.index_owned_by(Handedness::Right), None);
    }
}
