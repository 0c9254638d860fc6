use crate::*;
use log::debug;
use rayon::prelude::*;

impl<S: Surface + Sync> OpticalSystem<S> {
    /// Same as [`OpticalSystem::trace`], but each source's batch is split
    /// into chunks of at most `chunk_size` rays traced on the rayon pool.
    ///
    /// Chunks are glued back in lane order, so the result is identical to
    /// that of `trace`.
    ///
    /// # Panics
    ///
    /// if `chunk_size` is zero
    #[must_use]
    pub fn trace_parallel(&self, n: usize, chunk_size: usize) -> Trace {
        let sources = self
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let chunks = source.generate(n).chunks(chunk_size);
                debug!("tracing {n} rays from source {index} in {} chunks", chunks.len());

                if chunks.is_empty() {
                    return self.propagate(Rays::default());
                }

                // each chunk gets its own footprint buffers, merged afterwards
                let traces: Vec<SourceTrace> = chunks
                    .into_par_iter()
                    .map(|chunk| self.propagate(chunk))
                    .collect();

                traces
                    .into_iter()
                    .fold(SourceTrace::default(), |mut acc, trace| {
                        acc.concat(trace);
                        acc
                    })
            })
            .collect();

        Trace { sources }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::tests::Flat;
    use core::f64::consts::FRAC_PI_4;

    fn system() -> OpticalSystem<Flat> {
        let mut mirror = Element::mirror(
            Flat::default(),
            Member::new(
                Vector::new(0.0, 0.0, 1.0),
                Vector::new(FRAC_PI_4, 0.0, 0.0),
                Vector::zeros(),
                Vector::zeros(),
            ),
        );
        mirror.geometry.aperture = Aperture::try_new(0.2, 0.2).unwrap();

        let sources = (0..3)
            .map(|seed| {
                Source::gaussian(
                    Member::default(),
                    1e-9,
                    Vector::new(0.1, 0.1, 0.0),
                    Vector::new(0.01, 0.0, 0.0),
                    seed,
                )
            })
            .collect();

        OpticalSystem::new(vec![mirror], sources)
    }

    #[test]
    fn test_parallel_trace_matches_sequential() {
        let system = system();
        let sequential = system.trace(257);
        for chunk_size in [1, 16, 100, 1000] {
            assert_eq!(system.trace_parallel(257, chunk_size), sequential);
        }
    }

    #[test]
    fn test_parallel_trace_of_nothing() {
        let system = system();
        assert_eq!(system.trace_parallel(0, 8), system.trace(0));
    }
}
