//! Upstream collaborators: event sources and the layer quantizer.

use htt_ir::QuantizedHit;

use crate::SourceError;

/// Pull-based supplier of events, each a list of hits.
///
/// `Ok(None)` is the end-of-input marker.
pub trait EventSource {
    type Hit;

    fn next_event(&mut self) -> Result<Option<Vec<Self::Hit>>, SourceError>;

    /// Number of events consumed so far.
    fn position(&self) -> usize;
}

/// Maps a hit onto a logical layer, super-strip and module.
///
/// Returns `None` for hits outside the instrumented region; generators
/// treat those as absent.
pub trait LayerQuantizer<H> {
    fn quantize(&self, hit: &H) -> Option<QuantizedHit>;
}

/// Quantizer for logical input, where hits were quantized upstream.
#[derive(Copy, Clone, Debug, Default)]
pub struct PreQuantized;

impl LayerQuantizer<QuantizedHit> for PreQuantized {
    #[inline]
    fn quantize(&self, hit: &QuantizedHit) -> Option<QuantizedHit> {
        hit.is_mapped().then_some(*hit)
    }
}

impl<H, F> LayerQuantizer<H> for F
where
    F: Fn(&H) -> Option<QuantizedHit>,
{
    #[inline]
    fn quantize(&self, hit: &H) -> Option<QuantizedHit> {
        self(hit)
    }
}

/// In-memory event source.
#[derive(Clone, Debug)]
pub struct VecSource<H> {
    events: std::vec::IntoIter<Vec<H>>,
    position: usize,
}

impl<H> VecSource<H> {
    pub fn new(events: Vec<Vec<H>>) -> Self {
        VecSource {
            events: events.into_iter(),
            position: 0,
        }
    }

    /// Events not yet consumed.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl<H> EventSource for VecSource<H> {
    type Hit = H;

    fn next_event(&mut self) -> Result<Option<Vec<H>>, SourceError> {
        let event = self.events.next();
        if event.is_some() {
            self.position += 1;
        }
        Ok(event)
    }

    fn position(&self) -> usize {
        self.position
    }
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    type Hit = S::Hit;

    fn next_event(&mut self) -> Result<Option<Vec<Self::Hit>>, SourceError> {
        (**self).next_event()
    }

    fn position(&self) -> usize {
        (**self).position()
    }
}
