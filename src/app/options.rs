use std::{borrow::Cow, sync::Arc, time::Duration};

use crate::{
    presentation::IconSet,
    types::{
        DataUriProbe, ImagePreviewSizes, ImageProbe, NumericTuning, ObjectCatalog, RenderContext,
        TypePalette, YesNoPresentation,
    },
};

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
    pub(crate) palette: Arc<TypePalette>,
    pub(crate) icons: Arc<IconSet>,
    pub(crate) catalog: Arc<ObjectCatalog>,
    pub(crate) probe: Arc<dyn ImageProbe>,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
            palette: Arc::new(TypePalette::default()),
            icons: Arc::new(IconSet::default()),
            catalog: Arc::new(ObjectCatalog::default()),
            probe: Arc::new(DataUriProbe),
        }
    }
}

impl UiOptions {
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_palette(mut self, palette: TypePalette) -> Self {
        self.palette = Arc::new(palette);
        self
    }

    pub fn with_numeric_tuning(self, tuning: NumericTuning) -> Self {
        self.map_palette(|palette| palette.with_numeric(tuning))
    }

    pub fn with_step(self, step: f64) -> Self {
        self.map_palette(|mut palette| {
            palette.numeric = palette.numeric.with_step(step);
            palette
        })
    }

    pub fn with_fast_step(self, step: f64) -> Self {
        self.map_palette(|mut palette| {
            palette.numeric = palette.numeric.with_fast_step(step);
            palette
        })
    }

    pub fn with_yes_no_labels(
        self,
        yes_label: impl Into<Cow<'static, str>>,
        no_label: impl Into<Cow<'static, str>>,
    ) -> Self {
        let (yes_label, no_label) = (yes_label.into(), no_label.into());
        self.map_palette(|mut palette| {
            palette.yes_no = palette.yes_no.clone().with_labels(yes_label, no_label);
            palette
        })
    }

    pub fn with_yes_no_presentation(self, presentation: YesNoPresentation) -> Self {
        self.map_palette(|palette| palette.with_yes_no(presentation))
    }

    pub fn with_image_sizes(self, sizes: ImagePreviewSizes) -> Self {
        self.map_palette(|palette| palette.with_image_sizes(sizes))
    }

    pub fn with_icons(mut self, icons: IconSet) -> Self {
        self.icons = Arc::new(icons);
        self
    }

    pub fn with_catalog(mut self, catalog: ObjectCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// Replace the image dimension probe run off the UI thread.
    pub fn with_probe(mut self, probe: impl ImageProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    pub fn palette(&self) -> Arc<TypePalette> {
        Arc::clone(&self.palette)
    }

    pub fn icons(&self) -> &IconSet {
        &self.icons
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            palette: Arc::clone(&self.palette),
            catalog: Arc::clone(&self.catalog),
        }
    }

    fn map_palette(mut self, map: impl FnOnce(TypePalette) -> TypePalette) -> Self {
        let updated = map((*self.palette).clone());
        self.palette = Arc::new(updated);
        self
    }
}
