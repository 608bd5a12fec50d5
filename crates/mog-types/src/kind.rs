//! The closed set of media object variants.
//!
//! Every media object carries exactly one [`ObjectKind`]. Each top-level
//! variant names a *discriminant* (which family the object belongs to) and
//! wraps the sub-kind within that family. Because this is a sum type, an
//! object can never have zero or several discriminants set at once.
//!
//! On the wire a kind is a single-key map, e.g.
//! `{"sdp_end_point": "WEBRTC_END_POINT"}`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root object sub-kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaObjectType {
    MediaPipeline,
}

/// SDP-negotiated endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SdpEndPointType {
    #[serde(rename = "RTP_END_POINT")]
    RtpEndPoint,
    #[serde(rename = "WEBRTC_END_POINT")]
    WebRtcEndPoint,
}

/// Endpoints that read from or write to a URI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UriEndPointType {
    PlayerEndPoint,
    RecorderEndPoint,
}

/// Plain endpoints without SDP or URI semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndPointType {
    HttpEndPoint,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MixerType {
    MainMixer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    #[serde(rename = "ZBAR_FILTER")]
    ZBarFilter,
}

/// The type tag of a media object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    MediaObject(MediaObjectType),
    SdpEndPoint(SdpEndPointType),
    UriEndPoint(UriEndPointType),
    EndPoint(EndPointType),
    Mixer(MixerType),
    Filter(FilterType),
}

/// Which family of [`ObjectKind`] is set, without the sub-kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Discriminant {
    MediaObject,
    SdpEndPoint,
    UriEndPoint,
    EndPoint,
    Mixer,
    Filter,
}

impl ObjectKind {
    /// Shorthand for the root pipeline kind.
    pub const fn media_pipeline() -> Self {
        Self::MediaObject(MediaObjectType::MediaPipeline)
    }

    pub fn discriminant(&self) -> Discriminant {
        match self {
            Self::MediaObject(_) => Discriminant::MediaObject,
            Self::SdpEndPoint(_) => Discriminant::SdpEndPoint,
            Self::UriEndPoint(_) => Discriminant::UriEndPoint,
            Self::EndPoint(_) => Discriminant::EndPoint,
            Self::Mixer(_) => Discriminant::Mixer,
            Self::Filter(_) => Discriminant::Filter,
        }
    }

    /// Returns `true` for the root pipeline kind.
    pub fn is_pipeline(&self) -> bool {
        matches!(self, Self::MediaObject(MediaObjectType::MediaPipeline))
    }

    /// Returns `true` if this kind accepts child objects.
    pub fn can_parent(&self) -> bool {
        self.is_pipeline()
    }

    /// Returns `true` for endpoints that accept `start`/`pause`/`stop`.
    pub fn is_uri_end_point(&self) -> bool {
        matches!(self, Self::UriEndPoint(_))
    }

    /// Returns `true` for the HTTP endpoint.
    pub fn is_http_end_point(&self) -> bool {
        matches!(self, Self::EndPoint(EndPointType::HttpEndPoint))
    }

    /// Stable wire name of the sub-kind (e.g. `"RTP_END_POINT"`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::MediaObject(MediaObjectType::MediaPipeline) => "MEDIA_PIPELINE",
            Self::SdpEndPoint(SdpEndPointType::RtpEndPoint) => "RTP_END_POINT",
            Self::SdpEndPoint(SdpEndPointType::WebRtcEndPoint) => "WEBRTC_END_POINT",
            Self::UriEndPoint(UriEndPointType::PlayerEndPoint) => "PLAYER_END_POINT",
            Self::UriEndPoint(UriEndPointType::RecorderEndPoint) => "RECORDER_END_POINT",
            Self::EndPoint(EndPointType::HttpEndPoint) => "HTTP_END_POINT",
            Self::Mixer(MixerType::MainMixer) => "MAIN_MIXER",
            Self::Filter(FilterType::ZBarFilter) => "ZBAR_FILTER",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Discriminant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MediaObject => "MEDIA_OBJECT",
            Self::SdpEndPoint => "SDP_END_POINT",
            Self::UriEndPoint => "URI_END_POINT",
            Self::EndPoint => "END_POINT",
            Self::Mixer => "MIXER",
            Self::Filter => "FILTER",
        }
    }
}

impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
