use crate::*;
use log::debug;

/// Everything that happened to the rays of one source during a trace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceTrace {
    /// `stages[0]` holds the rays as emitted by the source, in world
    /// coordinates, and `stages[k + 1]` the rays leaving element `k`.
    /// All stages have the same number of lanes.
    pub stages: Vec<Rays>,
    /// `footprints[k]` holds the hits on element `k`, in lane order.
    pub footprints: Vec<Vec<FootprintPoint>>,
}

impl SourceTrace {
    /// Rays that made it through every element.
    #[inline]
    #[must_use]
    pub fn output(&self) -> Option<&Rays> {
        self.stages.last()
    }

    /// The first stage where `lane` is missing, if it was ever lost.
    #[must_use]
    pub fn lost_at(&self, lane: usize) -> Option<usize> {
        self.stages
            .iter()
            .position(|stage| stage.lanes().get(lane).map_or(true, Option::is_none))
    }

    /// A copy of the stages where a lost lane holds on to the last point its
    /// ray reached, as a stopped ray, so every lane can be drawn as a
    /// complete (possibly shortened) path.
    #[must_use]
    pub fn frozen(&self) -> Vec<Rays> {
        let mut last: Vec<Option<Ray>> = Vec::new();

        self.stages
            .iter()
            .map(|stage| {
                last.resize(stage.len(), None);
                stage
                    .lanes()
                    .iter()
                    .zip(&mut last)
                    .map(|(lane, held)| {
                        match lane {
                            Some(ray) => *held = Some(*ray),
                            None => {
                                if let Some(ray) = held.as_mut() {
                                    *ray = Ray::stopped(ray.endpoint, ray.wavelength);
                                }
                            }
                        }
                        *held
                    })
                    .collect::<Rays>()
            })
            .collect()
    }

    /// Appends the stages and footprints of `other`, lane-wise, after those
    /// of `self`. Both must come from the same system.
    pub fn concat(&mut self, other: Self) {
        if self.stages.is_empty() {
            *self = other;
            return;
        }

        for (stage, more) in self.stages.iter_mut().zip(other.stages) {
            *stage = Rays::concat([core::mem::take(stage), more]);
        }
        for (footprint, more) in self.footprints.iter_mut().zip(other.footprints) {
            footprint.extend(more);
        }
    }
}

/// The result of [`OpticalSystem::trace`]: one [`SourceTrace`] per source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    pub sources: Vec<SourceTrace>,
}

impl Trace {
    /// Hits of the rays from `source` on `element`.
    pub fn footprint(&self, element: usize, source: usize) -> Result<&[FootprintPoint]> {
        let trace = self.sources.get(source).ok_or(Error::OutOfRange {
            kind: "source",
            index: source,
            len: self.sources.len(),
        })?;

        trace
            .footprints
            .get(element)
            .map(Vec::as_slice)
            .ok_or(Error::OutOfRange {
                kind: "element",
                index: element,
                len: trace.footprints.len(),
            })
    }
}

/// An ordered list of elements, lit by a list of sources.
///
/// Tracing is sequential: the rays leaving element `k` are exactly the
/// rays entering element `k + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct OpticalSystem<S> {
    pub elements: Vec<Element<S>>,
    pub sources: Vec<Source>,
}

impl<S> Default for OpticalSystem<S> {
    #[inline]
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            sources: Vec::new(),
        }
    }
}

impl<S: Surface> OpticalSystem<S> {
    #[inline]
    #[must_use]
    pub fn new(elements: Vec<Element<S>>, sources: Vec<Source>) -> Self {
        Self { elements, sources }
    }

    pub fn source(&self, index: usize) -> Result<&Source> {
        self.sources.get(index).ok_or(Error::OutOfRange {
            kind: "source",
            index,
            len: self.sources.len(),
        })
    }

    /// Sends world-space `rays` through every element, in order.
    #[must_use]
    pub fn propagate(&self, rays: Rays) -> SourceTrace {
        let mut stages = Vec::with_capacity(self.elements.len() + 1);
        let mut footprints = Vec::with_capacity(self.elements.len());

        let mut current = rays;

        for (i, element) in self.elements.iter().enumerate() {
            let Propagation { rays, footprint } = element.propagate(&current);
            debug!("element {i}: {} of {} rays left", rays.alive(), rays.len());
            footprints.push(footprint.into_iter().flatten().collect());
            stages.push(core::mem::replace(&mut current, rays));
        }
        stages.push(current);

        SourceTrace { stages, footprints }
    }

    /// Traces `n` rays from the source at `index`.
    pub fn trace_source(&self, index: usize, n: usize) -> Result<SourceTrace> {
        let source = self.source(index)?;
        debug!("tracing {n} rays from source {index}");
        Ok(self.propagate(source.generate(n)))
    }

    /// Traces `n` rays from each source.
    #[must_use]
    pub fn trace(&self, n: usize) -> Trace {
        let sources = self
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                debug!("tracing {n} rays from source {index}");
                self.propagate(source.generate(n))
            })
            .collect();

        Trace { sources }
    }

    /// The optical axis as seen from the source at `index`: the world points
    /// where its central ray starts and then hits each element, in order,
    /// up to the first element it misses or stops at.
    pub fn axis(&self, index: usize) -> Result<Vec<Point>> {
        let source = self.source(index)?;
        let mut ray = source.member.globalize_ray(&source.central_ray());
        let mut points = vec![ray.endpoint];

        for element in &self.elements {
            let Some(next) = element.propagate(&Rays::new(vec![Some(ray)])).rays[0] else {
                break;
            };
            points.push(next.endpoint);
            if next.is_stopped() {
                break;
            }
            ray = next;
        }

        Ok(points)
    }
}
