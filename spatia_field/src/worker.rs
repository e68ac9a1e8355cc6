// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Message-driven front end for a [`DistanceField`].
//!
//! A [`FieldWorker`] owns one field and processes [`FieldRequest`]s one at a
//! time, so it can live on its own thread behind a channel. With the `serde`
//! feature the messages use the JSON shape
//! `{ "type": "addShape", "data": { ... } }`.

#[cfg(feature = "serde")]
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Color;

use crate::{DistanceField, FieldConfig, Shape, ShapeId};

/// Outline and colour of a shape as carried in a request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeMessage {
    /// Shape id.
    pub id: ShapeId,
    /// Outline vertices in world space.
    pub points: Vec<Point>,
    /// Straight RGBA8 colour.
    pub color: [u8; 4],
}

impl ShapeMessage {
    fn into_shape(self) -> (ShapeId, Shape) {
        let [r, g, b, a] = self.color;
        (self.id, Shape::new(self.points, Color::from_rgba8(r, g, b, a)))
    }
}

/// A request understood by [`FieldWorker::handle`].
///
/// Deserialization reads `type` first and decodes `data` according to it; an
/// unrecognized `type` becomes [`FieldRequest::Unknown`] with its payload
/// skipped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "data", rename_all = "camelCase")
)]
pub enum FieldRequest {
    /// Creates the grid, or resizes it keeping registered shapes.
    Initialize(FieldConfig),
    /// Registers a new shape.
    AddShape(ShapeMessage),
    /// Replaces a registered shape.
    UpdateShape(ShapeMessage),
    /// Unregisters a shape.
    RemoveShape(ShapeId),
    /// Recomputes if needed and replies with [`FieldResponse::ImageData`].
    GenerateImageData,
    /// Any message type this worker does not know.
    Unknown,
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FieldRequest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RequestVisitor)
    }
}

#[cfg(feature = "serde")]
struct RequestVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for RequestVisitor {
    type Value = FieldRequest;

    fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("a field request object with `type` and optional `data`")
    }

    fn visit_map<A>(self, mut map: A) -> Result<FieldRequest, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        use serde::de::{Error, IgnoredAny};

        let mut kind: Option<String> = None;
        let mut request = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "type" => {
                    if kind.is_some() {
                        return Err(A::Error::duplicate_field("type"));
                    }
                    kind = Some(map.next_value()?);
                }
                "data" => {
                    if request.is_some() {
                        return Err(A::Error::duplicate_field("data"));
                    }
                    let Some(kind) = kind.as_deref() else {
                        return Err(A::Error::custom("`type` must precede `data`"));
                    };
                    request = Some(match kind {
                        "initialize" => FieldRequest::Initialize(map.next_value()?),
                        "addShape" => FieldRequest::AddShape(map.next_value()?),
                        "updateShape" => FieldRequest::UpdateShape(map.next_value()?),
                        "removeShape" => FieldRequest::RemoveShape(map.next_value()?),
                        "generateImageData" => {
                            map.next_value::<IgnoredAny>()?;
                            FieldRequest::GenerateImageData
                        }
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                            FieldRequest::Unknown
                        }
                    });
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        if let Some(request) = request {
            return Ok(request);
        }
        match kind.as_deref() {
            None => Err(A::Error::missing_field("type")),
            Some("generateImageData") => Ok(FieldRequest::GenerateImageData),
            Some("initialize" | "addShape" | "updateShape" | "removeShape") => {
                Err(A::Error::missing_field("data"))
            }
            Some(_) => Ok(FieldRequest::Unknown),
        }
    }
}

/// A reply produced by [`FieldWorker::handle`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "data", rename_all = "camelCase")
)]
pub enum FieldResponse {
    /// Row-major RGBA8 pixels, one per grid cell.
    ImageData {
        /// Pixels per row.
        width: usize,
        /// Number of rows.
        height: usize,
        /// `width * height * 4` bytes.
        data: Vec<u8>,
    },
}

/// Owns a [`DistanceField`] and applies requests to it.
///
/// Requests that fail, arrive before `initialize`, or have an unknown type
/// are logged at `warn` and otherwise ignored; the worker keeps running.
///
/// ```
/// use kurbo::Point;
/// use spatia_field::{FieldConfig, FieldRequest, FieldResponse, FieldWorker, ShapeId, ShapeMessage};
///
/// let mut worker = FieldWorker::new();
/// worker.handle(FieldRequest::Initialize(FieldConfig::default().with_resolution(4)));
/// worker.handle(FieldRequest::AddShape(ShapeMessage {
///     id: ShapeId(1),
///     points: vec![Point::new(1.0, 1.0)],
///     color: [255, 0, 0, 255],
/// }));
///
/// let Some(FieldResponse::ImageData { width, data, .. }) =
///     worker.handle(FieldRequest::GenerateImageData)
/// else {
///     panic!("expected image data");
/// };
/// assert_eq!(width, 4);
/// assert_eq!(&data[(4 + 1) * 4..(4 + 2) * 4], &[255, 0, 0, 255]);
/// ```
#[derive(Debug, Default)]
pub struct FieldWorker {
    field: Option<DistanceField>,
}

impl FieldWorker {
    /// Creates a worker with no grid; send `initialize` first.
    pub fn new() -> Self {
        Self::default()
    }

    /// The field, once initialized.
    pub fn field(&self) -> Option<&DistanceField> {
        self.field.as_ref()
    }

    /// Applies one request, returning a reply if the request produces one.
    pub fn handle(&mut self, request: FieldRequest) -> Option<FieldResponse> {
        match request {
            FieldRequest::Initialize(config) => {
                let result = match self.field.as_mut() {
                    Some(field) => field.reconfigure(config),
                    None => DistanceField::new(config).map(|field| self.field = Some(field)),
                };
                match result {
                    Ok(()) => log::debug!("initialized {0}x{0} field", config.resolution),
                    Err(err) => log::warn!("initialize failed: {err}"),
                }
                None
            }
            FieldRequest::AddShape(message) => {
                let field = self.require_field("addShape")?;
                let (id, shape) = message.into_shape();
                if let Err(err) = field.add_shape(id, shape) {
                    log::warn!("addShape ignored: {err}");
                }
                None
            }
            FieldRequest::UpdateShape(message) => {
                let field = self.require_field("updateShape")?;
                let (id, shape) = message.into_shape();
                if let Err(err) = field.update_shape(id, shape) {
                    log::warn!("updateShape ignored: {err}");
                }
                None
            }
            FieldRequest::RemoveShape(id) => {
                let field = self.require_field("removeShape")?;
                if let Err(err) = field.remove_shape(id) {
                    log::warn!("removeShape ignored: {err}");
                }
                None
            }
            FieldRequest::GenerateImageData => {
                let field = self.require_field("generateImageData")?;
                let size = field.resolution();
                Some(FieldResponse::ImageData {
                    width: size,
                    height: size,
                    data: field.generate_image_data(),
                })
            }
            FieldRequest::Unknown => {
                log::warn!("ignoring unrecognized field request");
                None
            }
        }
    }

    /// Handles requests until the source is exhausted, passing each reply to `respond`.
    ///
    /// With a channel receiver's iterator as `requests`, this is the body of a
    /// worker thread.
    pub fn run(
        &mut self,
        requests: impl IntoIterator<Item = FieldRequest>,
        mut respond: impl FnMut(FieldResponse),
    ) {
        for request in requests {
            if let Some(response) = self.handle(request) {
                respond(response);
            }
        }
    }

    fn require_field(&mut self, request: &str) -> Option<&mut DistanceField> {
        if self.field.is_none() {
            log::warn!("{request} ignored: field not initialized");
        }
        self.field.as_mut()
    }
}
