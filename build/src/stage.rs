use crate::{Config, Pipeline};

/// Shader model mesh and amplification shaders are always compiled with.
pub const MESH_SHADER_MODEL: &str = "6_5";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Pixel,
    Vertex,
    Compute,
    Hull,
    Domain,
    Geometry,
    Mesh,
    Amplification,
}

impl Stage {
    /// Filename suffix and profile prefix of the stage.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Pixel => "ps",
            Self::Vertex => "vs",
            Self::Compute => "cs",
            Self::Hull => "hs",
            Self::Domain => "ds",
            Self::Geometry => "gs",
            Self::Mesh => "ms",
            Self::Amplification => "as",
        }
    }

    pub fn fixed_model(self) -> Option<&'static str> {
        match self {
            Self::Mesh | Self::Amplification => Some(MESH_SHADER_MODEL),
            _ => None,
        }
    }

    pub fn profile(self, model: &str) -> String {
        format!("{}_{}", self.tag(), model)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Compile { stage: Stage, model: String },
    Passthrough,
    Skip,
}

pub struct Classifier<'a> {
    pipeline: Pipeline,
    shader_model: &'a str,
    source_extension: &'a str,
    header_extension: &'a str,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            pipeline: config.pipeline,
            shader_model: config.shader_model(),
            source_extension: &config.source_extension,
            header_extension: &config.header_extension,
        }
    }

    pub fn classify(&self, file_name: &str) -> Classification {
        if !self.header_extension.is_empty()
            && file_name.ends_with(&format!(".{}", self.header_extension))
        {
            return Classification::Skip;
        }
        match self.pipeline {
            Pipeline::Modern => self.classify_modern(file_name),
            Pipeline::Legacy => self.classify_legacy(file_name),
        }
    }

    fn classify_modern(&self, file_name: &str) -> Classification {
        let stage = self.pipeline.stages().iter().copied().find(|stage| {
            file_name.ends_with(&format!("_{}.{}", stage.tag(), self.source_extension))
        });
        if let Some(stage) = stage {
            let model = stage.fixed_model().unwrap_or(self.shader_model);
            return Classification::Compile {
                stage,
                model: model.to_owned(),
            };
        }
        if self.pipeline.has_passthrough()
            && file_name.ends_with(&format!("rts.{}", self.source_extension))
        {
            return Classification::Passthrough;
        }
        Classification::Skip
    }

    fn classify_legacy(&self, file_name: &str) -> Classification {
        let stem = base_name(file_name);
        if stem.len() == file_name.len() {
            return Classification::Skip;
        }
        self.pipeline
            .stages()
            .iter()
            .copied()
            .find(|stage| stem.ends_with(&format!("_{}", stage.tag())))
            .map_or(Classification::Skip, |stage| Classification::Compile {
                stage,
                model: self.shader_model.to_owned(),
            })
    }
}

/// File name up to its first `.`, ignoring a leading one.
pub fn base_name(file_name: &str) -> &str {
    match file_name
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '.')
    {
        Some((index, _)) => &file_name[..index],
        None => file_name,
    }
}
