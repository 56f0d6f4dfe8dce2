use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// CPU units and memory (MiB) reserved for one task.
///
/// Only the combinations accepted by Fargate are valid:
///
/// | CPU   | Memory (MiB)                        |
/// |-------|-------------------------------------|
/// | 256   | 512, 1024, 2048                     |
/// | 512   | 1024 ..= 4096, step 1024            |
/// | 1024  | 2048 ..= 8192, step 1024            |
/// | 2048  | 4096 ..= 16384, step 1024           |
/// | 4096  | 8192 ..= 30720, step 1024           |
/// | 8192  | 16384 ..= 61440, step 4096          |
/// | 16384 | 32768 ..= 122880, step 8192         |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSize {
    pub cpu: u32,
    pub memory_mib: u32,
}

impl TaskSize {
    /// Build a size, rejecting unsupported combinations.
    pub fn new(cpu: u32, memory_mib: u32) -> ModelResult<Self> {
        let size = Self { cpu, memory_mib };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if Self::is_supported(self.cpu, self.memory_mib) {
            Ok(())
        } else {
            Err(ModelError::InvalidTaskSize {
                cpu: self.cpu,
                memory_mib: self.memory_mib,
            })
        }
    }

    pub fn is_supported(cpu: u32, memory_mib: u32) -> bool {
        match cpu {
            256 => matches!(memory_mib, 512 | 1024 | 2048),
            512 => in_steps(memory_mib, 1024, 4096, 1024),
            1024 => in_steps(memory_mib, 2048, 8192, 1024),
            2048 => in_steps(memory_mib, 4096, 16384, 1024),
            4096 => in_steps(memory_mib, 8192, 30720, 1024),
            8192 => in_steps(memory_mib, 16384, 61440, 4096),
            16384 => in_steps(memory_mib, 32768, 122880, 8192),
            _ => false,
        }
    }
}

fn in_steps(value: u32, min: u32, max: u32, step: u32) -> bool {
    (min..=max).contains(&value) && (value - min) % step == 0
}

impl fmt::Display for TaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cpu / {} MiB", self.cpu, self.memory_mib)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskSize;
    use crate::ModelError;

    #[test]
    fn accepts_runner_sizing() {
        let size = TaskSize::new(1024, 2048).unwrap();
        assert_eq!(size.cpu, 1024);
        assert_eq!(size.memory_mib, 2048);
    }

    #[test]
    fn rejects_memory_below_cpu_floor() {
        assert_eq!(
            TaskSize::new(1024, 512),
            Err(ModelError::InvalidTaskSize {
                cpu: 1024,
                memory_mib: 512
            })
        );
    }

    #[test]
    fn table_edges() {
        let ok = [
            (256, 512),
            (256, 2048),
            (512, 4096),
            (1024, 8192),
            (2048, 16384),
            (4096, 30720),
            (8192, 20480),
            (16384, 122880),
        ];
        for (cpu, mem) in ok {
            assert!(TaskSize::is_supported(cpu, mem), "{cpu}/{mem} should be valid");
        }

        let bad = [
            (256, 1536),
            (512, 512),
            (1024, 2500),
            (1024, 9216),
            (8192, 17408),
            (3072, 8192),
            (0, 0),
        ];
        for (cpu, mem) in bad {
            assert!(!TaskSize::is_supported(cpu, mem), "{cpu}/{mem} should be invalid");
        }
    }
}
