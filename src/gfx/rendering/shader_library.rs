//! GLSL shader loading
//!
//! Shaders are plain GLSL 450 text files compiled at runtime through naga's
//! GLSL frontend. A shader that fails to read, parse or validate is reported
//! as a [`ShaderError`] and left out of the library; pipelines that need it
//! are skipped later instead of aborting the program.

use std::{
    borrow::Cow,
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile shader {}:\n{message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("shader {} failed validation:\n{message}", .path.display())]
    Validation { path: PathBuf, message: String },
}

/// Reads, parses and validates a GLSL file for the given stage.
pub fn compile_glsl(path: &Path, stage: naga::ShaderStage) -> Result<naga::Module, ShaderError> {
    let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    compile_glsl_source(&source, path, stage)
}

/// Parses and validates GLSL text. `path` is only used in diagnostics.
pub fn compile_glsl_source(
    source: &str,
    path: &Path,
    stage: naga::ShaderStage,
) -> Result<naga::Module, ShaderError> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let module = frontend
        .parse(&naga::front::glsl::Options::from(stage), source)
        .map_err(|errors| ShaderError::Parse {
            path: path.to_path_buf(),
            message: errors.emit_to_string(source),
        })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|error| ShaderError::Validation {
        path: path.to_path_buf(),
        message: error.emit_to_string(source),
    })?;

    Ok(module)
}

/// Compiled shader modules, keyed by name
pub struct ShaderLibrary {
    device: Arc<wgpu::Device>,
    modules: HashMap<String, wgpu::ShaderModule>,
}

impl ShaderLibrary {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            modules: HashMap::new(),
        }
    }

    /// Compiles `path` and stores the module under `name`.
    ///
    /// On error the library is left unchanged.
    pub fn load_glsl(
        &mut self,
        name: &str,
        path: &Path,
        stage: naga::ShaderStage,
    ) -> Result<(), ShaderError> {
        let module = compile_glsl(path, stage)?;

        let shader_module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(name),
                source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
            });

        log::info!("Loaded {:?} shader '{}' from {}", stage, name, path.display());
        self.modules.insert(name.to_string(), shader_module);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&wgpu::ShaderModule> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader_path(file: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets/shaders")
            .join(file)
    }

    #[test]
    fn test_shipped_shaders_compile() {
        let shaders = [
            ("water.vert", naga::ShaderStage::Vertex),
            ("water.frag", naga::ShaderStage::Fragment),
            ("skybox.vert", naga::ShaderStage::Vertex),
            ("skybox.frag", naga::ShaderStage::Fragment),
        ];

        for (file, stage) in shaders {
            let module = compile_glsl(&shader_path(file), stage)
                .unwrap_or_else(|e| panic!("{file}: {e}"));
            assert_eq!(module.entry_points.len(), 1, "{file}");
            assert_eq!(module.entry_points[0].stage, stage, "{file}");
        }
    }

    #[test]
    fn test_malformed_shader_is_parse_error() {
        let source = "#version 450\nvoid main() { gl_Position = vec4(1.0; }\n";
        let err = compile_glsl_source(source, Path::new("broken.vert"), naga::ShaderStage::Vertex)
            .err()
            .unwrap();

        assert!(matches!(err, ShaderError::Parse { ref path, .. } if path == Path::new("broken.vert")));
        assert!(err.to_string().contains("broken.vert"));
    }

    #[test]
    fn test_malformed_shader_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.frag");
        std::fs::write(&path, "#version 450\nthis is not glsl\n").unwrap();

        assert!(matches!(
            compile_glsl(&path, naga::ShaderStage::Fragment),
            Err(ShaderError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_shader_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.vert");

        let err = compile_glsl(&path, naga::ShaderStage::Vertex).err().unwrap();
        assert!(matches!(err, ShaderError::Read { path: ref p, .. } if *p == path));
    }
}
