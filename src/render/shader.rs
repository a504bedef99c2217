//! Terrain shader sources and validation
//!
//! WGSL is parsed and validated with naga before any GPU module is created,
//! so a broken shader surfaces as an [`Error::Shader`] instead of a device
//! panic at pipeline creation.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, ShaderStage, TypeInner};

use crate::core::{Error, Result};

/// Vertex stage: `projection * view * model * position`
pub const VERTEX_SHADER: &str = include_str!("../../shaders/terrain_vertex.wgsl");

/// Fragment stage: solid color
pub const FRAGMENT_SHADER: &str = include_str!("../../shaders/terrain_fragment.wgsl");

/// Members the vertex shader's uniform block must declare, in upload order
pub const TRANSFORM_MEMBERS: [&str; 3] = ["projection", "view", "model"];

/// A WGSL source that passed validation
#[derive(Debug)]
pub struct ValidatedShader {
    pub label: String,
    pub module: naga::Module,
    /// Name of the entry point for the requested stage
    pub entry_point: String,
}

/// Parse and validate `source`, requiring an entry point for `stage`
pub fn compile(label: &str, source: &str, stage: ShaderStage) -> Result<ValidatedShader> {
    let shader_error = |message: String| Error::Shader { label: label.to_string(), message };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| shader_error(e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| shader_error(e.as_inner().to_string()))?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage)
        .map(|ep| ep.name.clone())
        .ok_or_else(|| shader_error(format!("no {:?} entry point", stage)))?;

    log::debug!("Validated shader {} (entry point {})", label, entry_point);

    Ok(ValidatedShader {
        label: label.to_string(),
        module,
        entry_point,
    })
}

/// Check that some uniform block in `shader` declares every name in `members`
pub fn require_uniform_members(shader: &ValidatedShader, members: &[&str]) -> Result<()> {
    let module = &shader.module;
    let declared: Vec<&str> = module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == AddressSpace::Uniform)
        .filter_map(|(_, var)| match &module.types[var.ty].inner {
            TypeInner::Struct { members, .. } => Some(members),
            _ => None,
        })
        .flatten()
        .filter_map(|member| member.name.as_deref())
        .collect();

    match members.iter().copied().find(|name| !declared.contains(name)) {
        Some(missing) => Err(Error::Shader {
            label: shader.label.clone(),
            message: format!("uniform `{}` not declared", missing),
        }),
        None => Ok(()),
    }
}

/// Create the GPU module for an already validated source
pub fn create_module(device: &wgpu::Device, shader: &ValidatedShader, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&shader.label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_shaders_validate() {
        let vertex = compile("terrain_vertex", VERTEX_SHADER, ShaderStage::Vertex).unwrap();
        assert_eq!(vertex.entry_point, "vs_main");
        require_uniform_members(&vertex, &TRANSFORM_MEMBERS).unwrap();

        let fragment = compile("terrain_fragment", FRAGMENT_SHADER, ShaderStage::Fragment).unwrap();
        assert_eq!(fragment.entry_point, "fs_main");
    }

    #[test]
    fn test_parse_error() {
        let broken = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0) ";
        match compile("broken", broken, ShaderStage::Vertex) {
            Err(Error::Shader { label, message }) => {
                assert_eq!(label, "broken");
                assert!(!message.is_empty());
            }
            other => panic!("expected shader error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_error() {
        // Returns a scalar where a vec4 is declared
        let invalid = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return 1.0; }";
        assert!(matches!(
            compile("invalid", invalid, ShaderStage::Vertex),
            Err(Error::Shader { .. })
        ));
    }

    #[test]
    fn test_missing_entry_point() {
        let result = compile("fragment_only", FRAGMENT_SHADER, ShaderStage::Vertex);
        match result {
            Err(Error::Shader { message, .. }) => assert!(message.contains("entry point")),
            other => panic!("expected shader error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_uniform_member() {
        let source = r#"
            struct Transforms {
                projection: mat4x4<f32>,
                view: mat4x4<f32>,
            }
            @group(0) @binding(0) var<uniform> transforms: Transforms;

            @vertex
            fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
                return transforms.projection * transforms.view * vec4<f32>(position, 1.0);
            }
        "#;
        let shader = compile("no_model", source, ShaderStage::Vertex).unwrap();
        match require_uniform_members(&shader, &TRANSFORM_MEMBERS) {
            Err(Error::Shader { message, .. }) => assert!(message.contains("`model`")),
            other => panic!("expected missing uniform, got {:?}", other),
        }
    }

    #[test]
    fn test_fragment_has_no_uniforms() {
        let fragment = compile("terrain_fragment", FRAGMENT_SHADER, ShaderStage::Fragment).unwrap();
        assert!(require_uniform_members(&fragment, &["projection"]).is_err());
        assert!(require_uniform_members(&fragment, &[]).is_ok());
    }
}
