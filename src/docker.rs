use crate::config::LauncherConfig;
use crate::errors::{LauncherError, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Lifecycle operations on the edge node container
pub trait ContainerRuntime {
    /// Fails when the container engine cannot be reached
    fn check(&self) -> Result<()>;
    fn is_running(&self) -> Result<bool>;
    fn launch(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    /// Force-remove the container so its name can be reused; absent is not an error
    fn remove(&self) -> Result<()>;
}

/// `docker rm` stderr for a container that is already gone
pub fn is_missing_container(stderr: &str) -> bool {
    stderr.contains("No such container")
}

/// `ContainerRuntime` backed by the `docker` command line client
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
    container_name: String,
    image: String,
    volume_path: PathBuf,
    container_mount: String,
    env_file: PathBuf,
}

impl DockerCli {
    pub fn new(config: &LauncherConfig) -> Self {
        Self {
            binary: "docker".to_string(),
            container_name: config.container_name.clone(),
            image: config.image.clone(),
            volume_path: config.volume_path.clone(),
            container_mount: config.container_mount.clone(),
            env_file: config.env_file.clone(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    fn run(&self, args: &[String]) -> Result<String> {
        debug!("{} {}", self.binary, args.join(" "));
        let output = Command::new(&self.binary).args(args).output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(LauncherError::Docker {
                command: args.first().cloned().unwrap_or_default(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Arguments of `docker run` for the given host volume directory
    pub fn launch_args(&self, volume: &Path, with_env_file: bool) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "-d".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            self.container_name.clone(),
            "-v".to_string(),
            format!("{}:{}", volume.display(), self.container_mount),
        ];
        if with_env_file {
            args.push("--env-file".to_string());
            args.push(self.env_file.display().to_string());
        }
        args.push(self.image.clone());
        args
    }

    fn status_args(&self) -> Vec<String> {
        vec![
            "ps".to_string(),
            "--filter".to_string(),
            format!("name=^/{}$", self.container_name),
            "--format".to_string(),
            "{{.Names}}".to_string(),
        ]
    }
}

impl ContainerRuntime for DockerCli {
    fn check(&self) -> Result<()> {
        let version = self.run(&[
            "info".to_string(),
            "--format".to_string(),
            "{{.ServerVersion}}".to_string(),
        ])?;
        info!("Docker engine reachable (server version {})", version);
        Ok(())
    }

    fn is_running(&self) -> Result<bool> {
        let output = self.run(&self.status_args())?;
        Ok(output.lines().any(|line| line.trim() == self.container_name))
    }

    fn launch(&self) -> Result<()> {
        fs::create_dir_all(&self.volume_path)?;
        // Bind mounts need an absolute host path
        let volume = fs::canonicalize(&self.volume_path)?;
        let args = self.launch_args(&volume, self.env_file.is_file());

        let container_id = self.run(&args)?;
        info!("Started container {} ({})", self.container_name, container_id);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.run(&["stop".to_string(), self.container_name.clone()])?;
        info!("Stopped container {}", self.container_name);
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match self.run(&["rm".to_string(), "-f".to_string(), self.container_name.clone()]) {
            Ok(_) => {
                info!("Removed container {}", self.container_name);
                Ok(())
            }
            Err(LauncherError::Docker { ref stderr, .. }) if is_missing_container(stderr) => {
                debug!("Container {} already removed", self.container_name);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> DockerCli {
        let config = LauncherConfig {
            container_name: "edge_test".to_string(),
            image: "naeural/edge_node:test".to_string(),
            env_file: PathBuf::from("/home/user/.env"),
            ..Default::default()
        };
        DockerCli::new(&config)
    }

    #[test]
    fn test_launch_args_with_env_file() {
        let args = cli().launch_args(Path::new("/data/vol"), true);
        assert_eq!(
            args,
            vec![
                "run", "-d", "--rm", "--name", "edge_test",
                "-v", "/data/vol:/edge_node/_local_cache",
                "--env-file", "/home/user/.env",
                "naeural/edge_node:test",
            ]
        );
    }

    #[test]
    fn test_launch_args_without_env_file() {
        let args = cli().launch_args(Path::new("/data/vol"), false);
        assert!(!args.iter().any(|a| a == "--env-file"));
        assert_eq!(args.last().map(String::as_str), Some("naeural/edge_node:test"));
    }

    #[test]
    fn test_status_filter_is_exact() {
        let args = cli().status_args();
        assert!(args.contains(&"name=^/edge_test$".to_string()));
    }

    #[test]
    fn test_missing_container_detection() {
        assert!(is_missing_container("Error response from daemon: No such container: edge_test"));
        assert!(!is_missing_container(
            "Error response from daemon: Conflict. The container name \"/edge_test\" is already in use"
        ));
    }

    #[test]
    fn test_missing_binary_is_io_error() {
        let docker = cli().with_binary("definitely-not-a-docker-binary");
        assert!(matches!(docker.check(), Err(LauncherError::Io(_))));
        assert!(matches!(docker.is_running(), Err(LauncherError::Io(_))));
        assert!(matches!(docker.remove(), Err(LauncherError::Io(_))));
    }
}
