//! `flipdl completions <shell>` and `flipdl man`.

use anyhow::Result;
use std::io;

pub fn run_completions(shell: clap_complete::Shell, mut cmd: clap::Command) -> Result<()> {
    clap_complete::generate(shell, &mut cmd, "flipdl", &mut io::stdout());
    Ok(())
}

pub fn run_man(cmd: clap::Command) -> Result<()> {
    clap_mangen::Man::new(cmd).render(&mut io::stdout())?;
    Ok(())
}
