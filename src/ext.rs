use std::{
  fs::File,
  process::{Child, Command, ExitStatus},
  time::Duration,
};

use anyhow::{Context, Result};
use wait_timeout::ChildExt as WaitExt;

#[extend::ext]
pub impl Child {
  /// Waits for the child to exit. With a `timeout`, a child still running
  /// after it is killed and `Ok(None)` is returned.
  fn wait_for(&mut self, timeout: Option<Duration>) -> Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
      return self.wait().context("wait").map(Some);
    };

    let Some(status) = self.wait_timeout(timeout).context("wait")? else {
      self.kill().context("kill after timeout")?;
      self.wait().context("wait after kill")?;

      return Ok(None);
    };

    Ok(Some(status))
  }
}

#[extend::ext]
pub impl Command {
  /// Spawns the command reading `input` on stdin, with stdout and stderr
  /// both appended to `output`.
  fn spawn_redirected(&mut self, input: File, output: &File) -> Result<Child> {
    let stdout = output.try_clone().context("clone stdout")?;
    let stderr = output.try_clone().context("clone stderr")?;

    self.stdin(input).stdout(stdout).stderr(stderr).spawn().context("spawn")
  }
}
