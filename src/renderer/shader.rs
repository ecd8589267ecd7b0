//! WGSL shader loading with readable compile errors

use std::fmt;
use std::path::{Path, PathBuf};

/// Shader creation failure
#[derive(Debug)]
pub enum ShaderError {
    /// The shader file could not be read
    Io { path: PathBuf, source: std::io::Error },
    /// WGSL failed to compile; one entry per error message
    Compile { label: String, messages: Vec<String> },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io { path, source } => {
                write!(f, "failed to read shader {}: {source}", path.display())
            }
            ShaderError::Compile { label, messages } => {
                write!(f, "shader '{label}' failed to compile")?;
                for msg in messages {
                    write!(f, "\n  {msg}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Io { source, .. } => Some(source),
            ShaderError::Compile { .. } => None,
        }
    }
}

/// A compiled shader module
pub struct Shader {
    pub module: wgpu::ShaderModule,
    pub label: String,
}

impl Shader {
    /// Compile WGSL source, reporting errors with line numbers
    pub fn from_wgsl(
        device: &wgpu::Device,
        label: &str,
        source: &str,
    ) -> Result<Self, ShaderError> {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let info = pollster::block_on(module.get_compilation_info());
        let messages: Vec<String> = info
            .messages
            .iter()
            .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
            .map(|m| match &m.location {
                Some(loc) => format!(
                    "line {}:{}: {}",
                    loc.line_number, loc.line_position, m.message
                ),
                None => m.message.clone(),
            })
            .collect();

        for warning in info
            .messages
            .iter()
            .filter(|m| m.message_type == wgpu::CompilationMessageType::Warning)
        {
            log::warn!("{label}: {}", warning.message);
        }

        if !messages.is_empty() {
            return Err(ShaderError::Compile {
                label: label.to_string(),
                messages,
            });
        }

        log::debug!("Compiled shader {label}");
        Ok(Self {
            module,
            label: label.to_string(),
        })
    }

    /// Read a WGSL file and compile it
    pub fn from_path(device: &wgpu::Device, path: &Path) -> Result<Self, ShaderError> {
        let source = read_source(path)?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_wgsl(device, &label, &source)
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_source(Path::new("no/such/shader.wgsl")).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert!(err.to_string().contains("no/such/shader.wgsl"));
    }

    #[test]
    fn test_compile_error_lists_messages() {
        let err = ShaderError::Compile {
            label: "triangle".to_string(),
            messages: vec!["line 3:5: unknown identifier".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("triangle"));
        assert!(text.contains("line 3:5"));
    }
}
