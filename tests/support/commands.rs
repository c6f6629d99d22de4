//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a bullpen command with an isolated environment.
    ///
    /// HOME points at the temp home, the working directory holds
    /// `bullpen.toml`, and inherited bullpen variables are cleared.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("bullpen").expect("failed to find bullpen binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("BULLPEN_CONFIG");
        cmd.env_remove("BULLPEN_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run bullpen")
    }

    pub fn init_cmd(&self) -> Output {
        self.run(&["init"])
    }

    pub fn set(&self, project: &str, key: &str, val: &str) -> Output {
        self.run(&["set", key, val, "--project", project])
    }

    pub fn get(&self, project: &str, key: &str) -> Output {
        self.run(&["get", key, "--project", project])
    }

    pub fn rm(&self, project: &str, key: &str) -> Output {
        self.run(&["rm", key, "--project", project])
    }

    pub fn list(&self, project: &str) -> Output {
        self.run(&["list", "--project", project])
    }

    pub fn import(&self, project: &str, path: &str, overwrite: bool) -> Output {
        let mut args = vec!["import", path, "--project", project];
        if overwrite {
            args.push("--overwrite");
        }
        self.run(&args)
    }

    pub fn export(&self, project: &str) -> Output {
        self.run(&["export", "--project", project])
    }

    /// Write `json` to a file and run `policy put` on it.
    pub fn policy_put(&self, json: &str) -> Output {
        let path = self.write("policy.json", json);
        let path = path.to_string_lossy().to_string();
        self.run(&["policy", "put", &path])
    }

    pub fn policy_list_json(&self) -> Output {
        self.run(&["policy", "list", "--json"])
    }

    pub fn rotate_secret(&self, project: &str, secret: &str) -> Output {
        self.run(&["rotate", "--secret", secret, "--project", project])
    }

    pub fn tick_json(&self) -> Output {
        self.run(&["tick", "--json"])
    }

    pub fn due_json(&self) -> Output {
        self.run(&["due", "--json"])
    }
}
