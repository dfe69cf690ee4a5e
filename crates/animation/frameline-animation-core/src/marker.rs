//! Named frame positions that steer an animation's cursor.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerAction {
    /// Named cue; playback continues through it.
    #[default]
    Play,
    Stop,
    Jump,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    pub frame: i32,
    #[serde(default)]
    pub action: MarkerAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_to: Option<String>,
}

impl Marker {
    pub fn play(id: impl Into<String>, frame: i32) -> Self {
        Self {
            id: id.into(),
            frame,
            action: MarkerAction::Play,
            jump_to: None,
        }
    }

    pub fn stop(id: impl Into<String>, frame: i32) -> Self {
        Self {
            id: id.into(),
            frame,
            action: MarkerAction::Stop,
            jump_to: None,
        }
    }

    pub fn jump(id: impl Into<String>, frame: i32, jump_to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            frame,
            action: MarkerAction::Jump,
            jump_to: Some(jump_to.into()),
        }
    }
}

/// Markers sorted by frame. Ids are unique within a list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerList {
    markers: Vec<Marker>,
}

impl MarkerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert by frame; a marker with the same id is replaced.
    pub fn add_ordered(&mut self, marker: Marker) {
        if let Some(pos) = self.markers.iter().position(|m| m.id == marker.id) {
            self.markers.remove(pos);
        }
        let at = self.markers.partition_point(|m| m.frame <= marker.frame);
        self.markers.insert(at, marker);
    }

    pub fn find(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn at_frame(&self, frame: i32) -> Option<&Marker> {
        self.markers.iter().find(|m| m.frame == frame)
    }

    /// Earliest marker with `after < frame <= up_to`.
    pub fn first_in_range(&self, after: i32, up_to: i32) -> Option<&Marker> {
        let start = self.markers.partition_point(|m| m.frame <= after);
        self.markers.get(start).filter(|m| m.frame <= up_to)
    }

    pub fn remove(&mut self, id: &str) -> Option<Marker> {
        let pos = self.markers.iter().position(|m| m.id == id)?;
        Some(self.markers.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }
}

impl FromIterator<Marker> for MarkerList {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        let mut list = MarkerList::new();
        for m in iter {
            list.add_ordered(m);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_frame_order_and_unique_ids() {
        let mut list = MarkerList::new();
        list.add_ordered(Marker::stop("end", 20));
        list.add_ordered(Marker::play("start", 0));
        list.add_ordered(Marker::play("end", 10));
        let ids: Vec<_> = list.iter().map(|m| (m.id.as_str(), m.frame)).collect();
        assert_eq!(ids, vec![("start", 0), ("end", 10)]);
        assert_eq!(list.find("end").map(|m| m.action), Some(MarkerAction::Play));
    }

    #[test]
    fn range_excludes_start_frame() {
        let list: MarkerList = [Marker::play("a", 0), Marker::stop("b", 5)].into_iter().collect();
        assert_eq!(list.first_in_range(0, 4), None);
        assert_eq!(list.first_in_range(-1, 4).map(|m| m.id.as_str()), Some("a"));
        assert_eq!(list.first_in_range(0, 5).map(|m| m.id.as_str()), Some("b"));
        assert_eq!(list.at_frame(5).map(|m| m.id.as_str()), Some("b"));
    }

    #[test]
    fn serde_uses_jump_to() {
        let m: Marker =
            serde_json::from_str(r#"{"id":"e","frame":30,"action":"jump","jumpTo":"s"}"#).unwrap();
        assert_eq!(m, Marker::jump("e", 30, "s"));
        let json = serde_json::to_value(Marker::play("s", 0)).unwrap();
        assert!(json.get("jumpTo").is_none());
    }
}
