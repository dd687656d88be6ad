// src/geometry.rs - Point/polyline records and the scene sink that receives them
use crate::error::TrackError;
use nalgebra::Vector3;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Fingers,
    Hands,
    Arms,
    Tips,
}

impl Group {
    pub const ALL: [Group; 4] = [Group::Fingers, Group::Hands, Group::Arms, Group::Tips];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fingers => "fingers",
            Self::Hands => "hands",
            Self::Arms => "arms",
            Self::Tips => "tips",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttribValue {
    Int(i64),
    Float(f64),
    Vector(Vector3<f64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub position: Vector3<f64>,
    /// In assignment order.
    pub attributes: Vec<(&'static str, AttribValue)>,
    pub groups: Vec<Group>,
}

impl PointRecord {
    pub fn new(position: Vector3<f64>) -> Self {
        Self {
            position,
            attributes: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_attrib(mut self, name: &'static str, value: AttribValue) -> Self {
        self.attributes.push((name, value));
        self
    }

    pub fn in_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn attrib(&self, name: &str) -> Option<&AttribValue> {
        self.attributes.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn int_attrib(&self, name: &str) -> Option<i64> {
        match self.attrib(name) {
            Some(AttribValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn is_in(&self, group: Group) -> bool {
        self.groups.contains(&group)
    }
}

/// Open vertex chain; vertices index into `GeometryBuffer::points`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolylineRecord {
    pub vertices: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    pub points: Vec<PointRecord>,
    pub polylines: Vec<PolylineRecord>,
}

impl GeometryBuffer {
    pub fn push_point(&mut self, point: PointRecord) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.polylines.is_empty()
    }

    pub fn group_count(&self, group: Group) -> usize {
        self.points.iter().filter(|p| p.is_in(group)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolylineHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupHandle(pub usize);

/// Host geometry container. Groups must exist up front; the tracker never
/// creates them.
pub trait SceneSink {
    fn find_group(&self, name: &str) -> Option<GroupHandle>;
    fn create_point(&mut self) -> PointHandle;
    fn set_position(&mut self, point: PointHandle, position: Vector3<f64>);
    fn set_attribute(&mut self, point: PointHandle, name: &str, value: &AttribValue);
    fn add_to_group(&mut self, group: GroupHandle, point: PointHandle);
    fn create_open_polyline(&mut self) -> PolylineHandle;
    fn append_vertex(&mut self, polyline: PolylineHandle, point: PointHandle);
}

/// Copies a mapped buffer into `sink`. Every group is looked up before the
/// first point is created, so a missing group leaves the sink untouched.
pub fn write_geometry<S>(buffer: &GeometryBuffer, sink: &mut S) -> Result<(), TrackError>
where
    S: SceneSink + ?Sized,
{
    let mut groups = HashMap::new();
    for group in Group::ALL {
        let handle = sink
            .find_group(group.as_str())
            .ok_or(TrackError::MissingGroup(group.as_str()))?;
        groups.insert(group, handle);
    }

    let mut handles = Vec::with_capacity(buffer.points.len());
    for point in &buffer.points {
        let handle = sink.create_point();
        sink.set_position(handle, point.position);
        for (name, value) in &point.attributes {
            sink.set_attribute(handle, name, value);
        }
        for group in &point.groups {
            sink.add_to_group(groups[group], handle);
        }
        handles.push(handle);
    }

    for polyline in &buffer.polylines {
        let prim = sink.create_open_polyline();
        for &vertex in &polyline.vertices {
            sink.append_vertex(prim, handles[vertex]);
        }
    }

    debug!(
        points = buffer.points.len(),
        polylines = buffer.polylines.len(),
        "geometry written"
    );
    Ok(())
}

/// In-memory geometry container.
#[derive(Debug, Clone, Default)]
pub struct MemoryGeometry {
    pub positions: Vec<Vector3<f64>>,
    pub attributes: Vec<HashMap<String, AttribValue>>,
    pub group_names: Vec<String>,
    pub group_members: Vec<Vec<PointHandle>>,
    pub polylines: Vec<Vec<PointHandle>>,
}

impl MemoryGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container with the fingers/hands/arms/tips groups already declared.
    pub fn with_standard_groups() -> Self {
        let mut geo = Self::new();
        for group in Group::ALL {
            geo.add_group(group.as_str());
        }
        geo
    }

    pub fn add_group(&mut self, name: &str) -> GroupHandle {
        if let Some(handle) = self.find_group(name) {
            return handle;
        }
        self.group_names.push(name.to_string());
        self.group_members.push(Vec::new());
        GroupHandle(self.group_names.len() - 1)
    }

    pub fn members(&self, name: &str) -> &[PointHandle] {
        match self.find_group(name) {
            Some(GroupHandle(i)) => &self.group_members[i],
            None => &[],
        }
    }

    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    pub fn attribute(&self, point: PointHandle, name: &str) -> Option<&AttribValue> {
        self.attributes.get(point.0).and_then(|attrs| attrs.get(name))
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.attributes.clear();
        self.polylines.clear();
        for members in &mut self.group_members {
            members.clear();
        }
    }
}

impl SceneSink for MemoryGeometry {
    fn find_group(&self, name: &str) -> Option<GroupHandle> {
        self.group_names.iter().position(|n| n == name).map(GroupHandle)
    }

    fn create_point(&mut self) -> PointHandle {
        self.positions.push(Vector3::zeros());
        self.attributes.push(HashMap::new());
        PointHandle(self.positions.len() - 1)
    }

    fn set_position(&mut self, point: PointHandle, position: Vector3<f64>) {
        self.positions[point.0] = position;
    }

    fn set_attribute(&mut self, point: PointHandle, name: &str, value: &AttribValue) {
        self.attributes[point.0].insert(name.to_string(), value.clone());
    }

    fn add_to_group(&mut self, group: GroupHandle, point: PointHandle) {
        self.group_members[group.0].push(point);
    }

    fn create_open_polyline(&mut self) -> PolylineHandle {
        self.polylines.push(Vec::new());
        PolylineHandle(self.polylines.len() - 1)
    }

    fn append_vertex(&mut self, polyline: PolylineHandle, point: PointHandle) {
        self.polylines[polyline.0].push(point);
    }
}
