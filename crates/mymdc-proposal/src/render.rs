use std::io::Write;

use crate::error::Result;
use crate::timeline::Timeline;

pub trait Renderer {
    type Output;

    fn render(&mut self, title: &str, timeline: &Timeline) -> Result<Self::Output>;
}

pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    type Output = ();

    fn render(&mut self, title: &str, timeline: &Timeline) -> Result<()> {
        writeln!(self.out, "{}", title)?;
        writeln!(self.out, "events:")?;
        if timeline.events.is_empty() {
            writeln!(self.out, "  (none)")?;
        }
        for event in &timeline.events {
            writeln!(
                self.out,
                "  {:<20} {}",
                event.label,
                event.timestamp.to_rfc3339()
            )?;
        }
        writeln!(self.out, "time taken [minutes]:")?;
        if timeline.intervals.is_empty() {
            writeln!(self.out, "  (none)")?;
        }
        for interval in &timeline.intervals {
            writeln!(self.out, "  {:<20} {:.1}", interval.label, interval.minutes())?;
        }
        self.out.flush()?;
        Ok(())
    }
}
