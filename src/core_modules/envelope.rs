// THEORY:
// The lower envelope is the heart of the exact distance transform. Every
// position `j` of a 1-D cost array contributes a parabola `(x - j)^2 + f[j]`;
// the 1-D squared distance at `x` is simply the lowest parabola at `x`.
//
// The envelope is kept as an ordered stack of segments. Each segment pairs a
// vertex (the root position of a parabola) with the coordinate where that
// parabola starts to be the lowest. A segment's interval runs from its own start
// to the next segment's start; the top segment's interval runs to +inf. So the
// real line is partitioned into intervals, each owned by exactly one vertex.
//
// Invariant: for any `x` inside a segment's interval, that segment's parabola is
// <= every other parabola pushed so far.
//
// Parabolas are pushed left to right. A new parabola rooted at `q` intersects the
// top parabola at
//
//     s = ((f[q] + q^2) - (f[v] + v^2)) / (2 (q - v))
//
// and if `s` lands at or before the top segment's start the top parabola is
// beaten everywhere it used to win, so it is popped. Each position is pushed and
// popped at most once, which keeps the build linear.

/// One stack entry: a parabola root and the left end of the interval it owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub vertex: usize,
    pub start: f64,
}

/// Ordered stack of `Segment`s describing the lowest parabola everywhere.
#[derive(Debug, Clone, Default)]
pub struct LowerEnvelope {
    segments: Vec<Segment>,
}

impl LowerEnvelope {
    /// Reserves room for envelopes over arrays of up to `n` positions.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            segments: Vec::with_capacity(n),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Rebuilds the envelope for `costs`, discarding any previous state.
    pub fn build(&mut self, costs: &[f32]) {
        self.segments.clear();
        if costs.is_empty() {
            return;
        }

        self.segments.push(Segment {
            vertex: 0,
            start: f64::NEG_INFINITY,
        });

        for q in 1..costs.len() {
            let mut start = f64::NEG_INFINITY;
            while let Some(top) = self.segments.last().copied() {
                start = Self::intersection(costs, top.vertex, q);
                if start > top.start || self.segments.len() == 1 {
                    break;
                }
                self.segments.pop();
            }
            self.segments.push(Segment { vertex: q, start });
        }
    }

    /// Evaluates the envelope at every integer position `0..out.len()`.
    ///
    /// `costs` must be the array the envelope was built from.
    pub fn query_into(&self, costs: &[f32], out: &mut [f32]) {
        let mut cursor = 0;
        for (i, slot) in out.iter_mut().enumerate() {
            let x = i as f64;
            while cursor + 1 < self.segments.len() && self.segments[cursor + 1].start < x {
                cursor += 1;
            }
            let vertex = self.segments[cursor].vertex;
            *slot = Self::parabola(costs, vertex, x) as f32;
        }
    }

    /// Value of the parabola rooted at `vertex`, evaluated at `x`.
    #[inline]
    pub fn parabola(costs: &[f32], vertex: usize, x: f64) -> f64 {
        let offset = x - vertex as f64;
        offset * offset + costs[vertex] as f64
    }

    /// Coordinate where the parabolas rooted at `v` and `q` (`v < q`) cross.
    #[inline]
    fn intersection(costs: &[f32], v: usize, q: usize) -> f64 {
        let (vf, qf) = (v as f64, q as f64);
        ((costs[q] as f64 + qf * qf) - (costs[v] as f64 + vf * vf)) / (2.0 * (qf - vf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_position_owns_the_whole_line() {
        let mut envelope = LowerEnvelope::with_capacity(1);
        envelope.build(&[3.0]);
        assert_eq!(
            envelope.segments(),
            &[Segment {
                vertex: 0,
                start: f64::NEG_INFINITY
            }]
        );
    }

    #[test]
    fn dominated_parabolas_are_popped() {
        // Position 1 is expensive and is beaten by 0 on the left and 2 on the right.
        let costs = [0.0, 100.0, 0.0];
        let mut envelope = LowerEnvelope::with_capacity(costs.len());
        envelope.build(&costs);
        let vertices: Vec<usize> = envelope.segments().iter().map(|s| s.vertex).collect();
        assert_eq!(vertices, vec![0, 2]);
        assert_eq!(envelope.segments()[1].start, 1.0);
    }

    #[test]
    fn segments_are_ordered_and_each_owner_is_lowest() {
        let costs = [7.0, 2.0, 9.0, 0.0, 4.0, 4.0, 1.0, 16.0, 3.0];
        let mut envelope = LowerEnvelope::with_capacity(costs.len());
        envelope.build(&costs);

        let segments = envelope.segments();
        for pair in segments.windows(2) {
            assert!(pair[0].vertex < pair[1].vertex);
            assert!(pair[0].start < pair[1].start);
        }

        for (k, segment) in segments.iter().enumerate() {
            let end = segments.get(k + 1).map_or(f64::INFINITY, |next| next.start);
            for x in 0..costs.len() {
                let x = x as f64;
                if x < segment.start || x > end {
                    continue;
                }
                let owner = LowerEnvelope::parabola(&costs, segment.vertex, x);
                for j in 0..costs.len() {
                    assert!(owner <= LowerEnvelope::parabola(&costs, j, x));
                }
            }
        }
    }

    #[test]
    fn rebuild_discards_previous_state() {
        let mut envelope = LowerEnvelope::with_capacity(4);
        envelope.build(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(envelope.len(), 4);
        envelope.build(&[5.0]);
        assert_eq!(envelope.len(), 1);
        envelope.build(&[]);
        assert!(envelope.is_empty());
    }
}
