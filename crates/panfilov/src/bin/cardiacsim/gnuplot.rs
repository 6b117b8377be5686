//! Interactive surface plots through a `gnuplot` child process.

use std::io::{self, BufRead, BufWriter, Write};
use std::process::{Command, Stdio};

use panfilov::engine::{GlobalSnapshot, SnapshotHook};

/// Shows each snapshot as a pm3d height map and waits for Enter.
///
/// The data is streamed inline after the `splot` command, so no files
/// are written. A plot that cannot be shown is logged and skipped; the
/// run continues.
#[derive(Debug)]
pub struct GnuplotHook {
    program: String,
}

impl Default for GnuplotHook {
    fn default() -> Self {
        Self::new("gnuplot")
    }
}

impl GnuplotHook {
    /// Plot with the given `gnuplot` executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn plot(&self, snapshot: &GlobalSnapshot) -> io::Result<()> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .spawn()?;
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "gnuplot stdin unavailable"))?;
        let mut out = BufWriter::new(stdin);
        write_script(&mut out, snapshot)?;
        out.flush()?;
        drop(out);

        println!("Press Enter to close the plot...");
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;

        // Closing stdin ends the gnuplot session and its window.
        drop(child.stdin.take());
        child.wait()?;
        Ok(())
    }
}

impl SnapshotHook for GnuplotHook {
    fn on_snapshot(&mut self, snapshot: &GlobalSnapshot) {
        tracing::debug!(niter = snapshot.niter, t = snapshot.t, "plotting snapshot");
        if let Err(e) = self.plot(snapshot) {
            tracing::warn!(
                program = %self.program,
                niter = snapshot.niter,
                error = %e,
                "unable to plot snapshot"
            );
        }
    }
}

/// Write the gnuplot commands and inline data for one snapshot.
///
/// Points are `x y E` with one-based coordinates, `x` running along a
/// row, and a blank line after each row so pm3d sees a grid.
pub fn write_script(out: &mut impl Write, snapshot: &GlobalSnapshot) -> io::Result<()> {
    let n = snapshot.n;
    writeln!(
        out,
        "set title 'Excitation at Time {} (Iteration {})'",
        snapshot.t, snapshot.niter
    )?;
    writeln!(out, "set xlabel 'X-axis'")?;
    writeln!(out, "set ylabel 'Y-axis'")?;
    writeln!(out, "set zlabel 'Excitation'")?;
    writeln!(out, "set xrange [1:{n}]")?;
    writeln!(out, "set yrange [1:{n}]")?;
    writeln!(out, "set pm3d")?;
    writeln!(out, "splot '-' with pm3d")?;
    for (row, values) in (0..n).map_while(|r| snapshot.row(r)).enumerate() {
        for (col, value) in values.iter().enumerate() {
            writeln!(out, "{} {} {}", col + 1, row + 1, value)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "e")
}
