mod datetime;
mod helpers;
mod image;
mod image_probe;
mod number;
mod object;
mod palette;
mod percentage;
mod settings;
mod string;
mod yesno;

use std::sync::Arc;

pub use datetime::{
    DateTimeInput, DateTimeObjectType, DisplayMode, InputKind, format_moment, humanize_relative,
    parse_datetime, validate_datetime,
};
pub use helpers::line_text;
pub(crate) use helpers::{handle_text_edit, hint_line, input_line};
pub use image::{ImageInput, ImageObjectType, validate_image};
pub use image_probe::{
    DataUriProbe, ImageDimensions, ImageProbe, ProbeError, check_dimensions, check_image,
    check_source, decode_data_uri, sniff_dimensions,
};
pub use number::{NumberInput, NumberObjectType, validate_number};
pub use object::{ObjectCatalog, ObjectObjectType, ObjectPicker, validate_object};
pub use palette::{
    ConfigureDefaults, ImagePreviewSizes, NumericTuning, TypePalette, YesNoPresentation,
};
pub use percentage::{PercentageInput, PercentageObjectType};
pub use string::{StringInput, StringObjectType, validate_string};
pub use yesno::{YesNoInput, YesNoObjectType, validate_yes_no};

/// Host-provided collaborators every type surface may consult.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub palette: Arc<TypePalette>,
    pub catalog: Arc<ObjectCatalog>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palette(mut self, palette: TypePalette) -> Self {
        self.palette = Arc::new(palette);
        self
    }

    pub fn with_catalog(mut self, catalog: ObjectCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }
}
