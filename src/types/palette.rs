use std::borrow::Cow;

/// Numeric stepping behaviour shared by number and percentage editors.
#[derive(Debug, Clone)]
pub struct NumericTuning {
    pub step: f64,
    pub fast_step: Option<f64>,
    pub percentage_step: f64,
}

impl NumericTuning {
    #[inline]
    pub fn step(&self, fast: bool) -> f64 {
        if fast {
            self.fast_step.unwrap_or(self.step)
        } else {
            self.step
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.max(f64::EPSILON);
        self
    }

    pub fn with_fast_step(mut self, step: f64) -> Self {
        self.fast_step = Some(step.max(f64::EPSILON));
        self
    }

    pub fn with_percentage_step(mut self, step: f64) -> Self {
        self.percentage_step = step.max(f64::EPSILON);
        self
    }
}

impl Default for NumericTuning {
    fn default() -> Self {
        Self {
            step: 1.0,
            fast_step: Some(10.0),
            percentage_step: 1.0,
        }
    }
}

/// Badge labels for the yes/no type.
#[derive(Debug, Clone)]
pub struct YesNoPresentation {
    pub yes_label: Cow<'static, str>,
    pub no_label: Cow<'static, str>,
    pub unset_label: Cow<'static, str>,
    pub placeholder: Cow<'static, str>,
}

impl YesNoPresentation {
    pub fn with_labels(
        mut self,
        yes_label: impl Into<Cow<'static, str>>,
        no_label: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.yes_label = yes_label.into();
        self.no_label = no_label.into();
        self
    }

    pub fn with_unset_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.unset_label = label.into();
        self
    }
}

impl Default for YesNoPresentation {
    fn default() -> Self {
        Self {
            yes_label: Cow::Borrowed("YES"),
            no_label: Cow::Borrowed("NO"),
            unset_label: Cow::Borrowed("N/A"),
            placeholder: Cow::Borrowed("Select"),
        }
    }
}

/// Pixel sizes for the three image preview presets.
#[derive(Debug, Clone)]
pub struct ImagePreviewSizes {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

impl ImagePreviewSizes {
    pub fn size_for(&self, preset: Option<&str>) -> u32 {
        match preset {
            Some("small") => self.small,
            Some("large") => self.large,
            _ => self.medium,
        }
    }
}

impl Default for ImagePreviewSizes {
    fn default() -> Self {
        Self {
            small: 100,
            medium: 200,
            large: 300,
        }
    }
}

/// Defaults shown by configure editors when a bound is unset.
#[derive(Debug, Clone)]
pub struct ConfigureDefaults {
    pub string_max_length: f64,
    pub percentage_min: f64,
    pub percentage_max: f64,
}

impl Default for ConfigureDefaults {
    fn default() -> Self {
        Self {
            string_max_length: 200.0,
            percentage_min: 0.0,
            percentage_max: 100.0,
        }
    }
}

/// Presentation tuning shared by every type's editors.
#[derive(Debug, Clone, Default)]
pub struct TypePalette {
    pub numeric: NumericTuning,
    pub yes_no: YesNoPresentation,
    pub image: ImagePreviewSizes,
    pub defaults: ConfigureDefaults,
}

impl TypePalette {
    pub fn with_numeric(mut self, tuning: NumericTuning) -> Self {
        self.numeric = tuning;
        self
    }

    pub fn with_yes_no(mut self, presentation: YesNoPresentation) -> Self {
        self.yes_no = presentation;
        self
    }

    pub fn with_image_sizes(mut self, sizes: ImagePreviewSizes) -> Self {
        self.image = sizes;
        self
    }

    pub fn with_defaults(mut self, defaults: ConfigureDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}
