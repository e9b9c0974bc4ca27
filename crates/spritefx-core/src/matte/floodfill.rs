use std::collections::VecDeque;

const UNSEEN: u8 = 0;
const QUEUED: u8 = 1;
const DONE: u8 = 2;

/// Mark every passable pixel that is 8-connected to the image border
/// through passable pixels.
///
/// Border pixels seed the fill; each popped seed is widened into a
/// horizontal run, and the rows above and below are scanned one pixel past
/// each end of the run so diagonal steps are followed. Runs instead of
/// single pixels keep the queue short on large flat backgrounds. Every
/// pixel is finalized at most once, so the cost is O(width × height).
///
/// The result is exactly the union of the connected components of
/// `passable` that touch the border.
pub(super) fn fill_border_connected(passable: &[bool], width: u32, height: u32) -> Vec<bool> {
    let len = width as usize * height as usize;
    debug_assert_eq!(passable.len(), len);

    let mut filled = vec![false; len];
    if width == 0 || height == 0 {
        return filled;
    }

    let mut state = vec![UNSEEN; len];
    let mut queue = VecDeque::with_capacity((width as usize + height as usize) * 2);

    enqueue_runs(&mut queue, &mut state, passable, width, 0, width - 1, 0);
    if height > 1 {
        enqueue_runs(&mut queue, &mut state, passable, width, 0, width - 1, height - 1);
    }
    for y in 1..height.saturating_sub(1) {
        enqueue_seed(&mut queue, &mut state, passable, width, 0, y);
        if width > 1 {
            enqueue_seed(&mut queue, &mut state, passable, width, width - 1, y);
        }
    }

    while let Some((sx, y)) = queue.pop_front() {
        let sidx = pixel_index(width, sx, y);
        if state[sidx] == DONE || !passable[sidx] {
            continue;
        }

        let mut left = sx;
        while left > 0 {
            let nidx = pixel_index(width, left - 1, y);
            if state[nidx] == DONE || !passable[nidx] {
                break;
            }
            left -= 1;
        }

        let mut right = sx;
        while right + 1 < width {
            let nidx = pixel_index(width, right + 1, y);
            if state[nidx] == DONE || !passable[nidx] {
                break;
            }
            right += 1;
        }

        let row = pixel_index(width, 0, y);
        for x in left..=right {
            filled[row + x as usize] = true;
            state[row + x as usize] = DONE;
        }

        // Diagonal neighbours of the run ends count as adjacent.
        let span_left = left.saturating_sub(1);
        let span_right = (right + 1).min(width - 1);
        if y > 0 {
            enqueue_runs(&mut queue, &mut state, passable, width, span_left, span_right, y - 1);
        }
        if y + 1 < height {
            enqueue_runs(&mut queue, &mut state, passable, width, span_left, span_right, y + 1);
        }
    }

    filled
}

/// Queue the first pixel of every unseen passable run in `left..=right`
/// on row `y`, marking the whole run as queued.
#[inline]
fn enqueue_runs(
    queue: &mut VecDeque<(u32, u32)>,
    state: &mut [u8],
    passable: &[bool],
    width: u32,
    left: u32,
    right: u32,
    y: u32,
) {
    let mut x = left;
    while x <= right {
        let idx = pixel_index(width, x, y);
        if state[idx] == UNSEEN && passable[idx] {
            queue.push_back((x, y));
            state[idx] = QUEUED;

            x += 1;
            while x <= right {
                let run_idx = pixel_index(width, x, y);
                if state[run_idx] != UNSEEN || !passable[run_idx] {
                    break;
                }
                state[run_idx] = QUEUED;
                x += 1;
            }
        } else {
            x += 1;
        }
    }
}

#[inline]
fn enqueue_seed(
    queue: &mut VecDeque<(u32, u32)>,
    state: &mut [u8],
    passable: &[bool],
    width: u32,
    x: u32,
    y: u32,
) {
    let idx = pixel_index(width, x, y);
    if state[idx] == UNSEEN && passable[idx] {
        state[idx] = QUEUED;
        queue.push_back((x, y));
    }
}

#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

#[cfg(test)]
mod tests {
    use super::fill_border_connected;

    /// Grow the border seeds by one 3×3 dilation per pass, clipped to the
    /// passable mask, until nothing changes.
    fn dilation_fixpoint(passable: &[bool], width: u32, height: u32) -> Vec<bool> {
        let (w, h) = (width as i64, height as i64);
        let at = |x: i64, y: i64| (y * w + x) as usize;

        let mut current = vec![false; passable.len()];
        for y in 0..h {
            for x in 0..w {
                let on_border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                current[at(x, y)] = on_border && passable[at(x, y)];
            }
        }

        loop {
            let mut next = current.clone();
            for y in 0..h {
                for x in 0..w {
                    if !passable[at(x, y)] || current[at(x, y)] {
                        continue;
                    }
                    let touches = (-1..=1).any(|dy| {
                        (-1..=1).any(|dx| {
                            let (nx, ny) = (x + dx, y + dy);
                            nx >= 0 && ny >= 0 && nx < w && ny < h && current[at(nx, ny)]
                        })
                    });
                    next[at(x, y)] = touches;
                }
            }
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn parse(rows: &[&str]) -> (Vec<bool>, u32, u32) {
        let width = rows[0].len() as u32;
        let height = rows.len() as u32;
        let mask = rows
            .iter()
            .flat_map(|row| row.bytes().map(|b| b == b'#'))
            .collect();
        (mask, width, height)
    }

    #[test]
    fn test_matches_dilation_fixpoint_on_random_masks() {
        for seed in 0_u64..64 {
            let mut rng = Lcg::new(seed.wrapping_mul(1_048_583).wrapping_add(97));
            let width = 1 + rng.next_u32() % 29;
            let height = 1 + rng.next_u32() % 23;
            let density = 35 + rng.next_u32() % 40;
            let passable: Vec<bool> = (0..width * height)
                .map(|_| rng.next_u32() % 100 < density)
                .collect();

            assert_eq!(
                fill_border_connected(&passable, width, height),
                dilation_fixpoint(&passable, width, height),
                "seed={seed} size={width}x{height}"
            );
        }
    }

    #[test]
    fn test_enclosed_region_is_not_filled() {
        let (mask, w, h) = parse(&[
            "#######", //
            "#.....#",
            "#.###.#",
            "#.###.#",
            "#.....#",
            "#######",
        ]);
        let filled = fill_border_connected(&mask, w, h);
        assert!(filled[0]);
        // Inner block at (2..=4, 2..=3) is separated by a non-passable ring.
        assert!(!filled[2 * 7 + 3]);
        assert_eq!(filled.iter().filter(|&&f| f).count(), 22);
    }

    #[test]
    fn test_diagonal_step_connects() {
        let (mask, w, h) = parse(&[
            "#....", //
            ".#...",
            "..#..",
            ".....",
        ]);
        let filled = fill_border_connected(&mask, w, h);
        assert!(filled[0]);
        assert!(filled[6]);
        assert!(filled[12]);
    }

    #[test]
    fn test_serpentine_path_is_followed() {
        let (mask, w, h) = parse(&[
            "#........", //
            "#.#####..",
            "#.#...#..",
            "###.#.#..",
            ".....##..",
            ".........",
        ]);
        let filled = fill_border_connected(&mask, w, h);
        assert_eq!(filled, dilation_fixpoint(&mask, w, h));
        // (4, 3) only reaches the border diagonally through (5, 4).
        assert!(filled[3 * 9 + 4]);
    }

    #[test]
    fn test_empty_and_degenerate_sizes() {
        assert!(fill_border_connected(&[], 0, 0).is_empty());
        assert_eq!(fill_border_connected(&[true, false, true], 3, 1), [true, false, true]);
        assert_eq!(fill_border_connected(&[true, true], 1, 2), [true, true]);
    }

    struct Lcg {
        state: u64,
    }

    impl Lcg {
        fn new(seed: u64) -> Self {
            Self { state: seed }
        }

        fn next_u32(&mut self) -> u32 {
            self.state = self
                .state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1);
            (self.state >> 32) as u32
        }
    }
}
