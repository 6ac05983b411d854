use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::{assets, error::VoxenError};

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads all shared WGSL modules at construction time. Consuming
/// shaders use `#import voxen::module_name` to pull in shared code. The
/// composer produces `naga::Module` IR directly, skipping WGSL re-parse
/// at runtime. Composition failures log the full diagnostic and return an
/// error so a bad shader never takes the process down.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

impl ShaderComposer {
    /// Build a composer with the crate's shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::ShaderCompose` if a built-in module fails to
    /// parse (broken asset checkout).
    pub fn new() -> Result<Self, VoxenError> {
        let mut composer = Composer::default();

        // Register shared modules in dependency order.
        // Modules with no dependencies first, then modules that depend on
        // earlier ones.
        let modules: &[ModuleDef] = &[
            ModuleDef {
                source: include_str!(
                    "../../assets/shaders/modules/camera.wgsl"
                ),
                file_path: "modules/camera.wgsl",
            },
            ModuleDef {
                source: include_str!(
                    "../../assets/shaders/modules/atlas.wgsl"
                ),
                file_path: "modules/atlas.wgsl",
            },
        ];

        for m in modules {
            if let Err(e) =
                composer.add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
            {
                let diagnostic = e.emit_to_string(&composer);
                log::error!(
                    "failed to register shader module {}: {diagnostic}",
                    m.file_path
                );
                return Err(VoxenError::ShaderCompose(diagnostic));
            }
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::ShaderCompose` if composition or validation
    /// fails; the diagnostic is also logged.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, VoxenError> {
        let naga_module = self
            .composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                let diagnostic = e.emit_to_string(&self.composer);
                log::error!(
                    "failed to compose shader {file_path}: {diagnostic}"
                );
                VoxenError::ShaderCompose(diagnostic)
            })?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader loaded from `assets/shaders/<name>`.
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::Asset` if the file cannot be read and
    /// `VoxenError::ShaderCompose` if composition fails.
    pub fn compose_file(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        name: &str,
    ) -> Result<wgpu::ShaderModule, VoxenError> {
        let path = assets::shader_path(name);
        let source = assets::load_string(&path)?;
        self.compose(device, label, &source, name)
    }

    /// Compose a shader source into a `naga::Module` without creating a
    /// wgpu shader module. Useful for testing shader composition without a
    /// GPU device.
    ///
    /// # Errors
    ///
    /// Returns the raw composer error, which callers can pretty-print.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<naga_oil::compose::ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shader source definitions for all composable shaders in the project.
    /// Each entry is (source, file_path).
    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (
                include_str!("../../assets/shaders/chunk.wgsl"),
                "chunk.wgsl",
            ),
            (
                include_str!("../../assets/shaders/chunk_visibility.wgsl"),
                "chunk_visibility.wgsl",
            ),
        ]
    }

    #[test]
    fn built_in_modules_register() {
        assert!(ShaderComposer::new().is_ok());
    }

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let _ = composer.compose_naga(source, file_path).unwrap_or_else(
                |e| panic!("Shader '{file_path}' failed to compose: {e}"),
            );
        }
    }

    #[test]
    fn imports_resolve_from_registered_modules() {
        let mut composer = ShaderComposer::new().unwrap();
        let source = r"
#import voxen::camera::world_to_clip

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return world_to_clip(position);
}
";
        let _ = composer.compose_naga(source, "inline_test.wgsl").unwrap();
    }

    #[test]
    fn invalid_source_reports_error() {
        let mut composer = ShaderComposer::new().unwrap();
        assert!(composer.compose_naga("not wgsl {", "broken.wgsl").is_err());
    }
}
