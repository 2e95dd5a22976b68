//! One-axis constraint-based layout solver.

use crate::geometry::Rect;

/// Which axis a [`split`] tiles along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Tile left-to-right, varying width.
    Horizontal,
    /// Tile top-to-bottom, varying height.
    Vertical,
}

/// A sizing constraint for one slot in a [`split`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// A fixed size.
    Length(u16),
    /// At least this size; grows to absorb slack.
    Min(u16),
    /// At most this size; grows to absorb slack, capped.
    Max(u16),
    /// A proportional share `numerator / denominator` of the axis size.
    Ratio(u32, u32),
    /// A flexible slot with the given weight; absorbs slack in proportion to
    /// other flex weights, and shrinks first when over-subscribed.
    Flex(u16),
}

/// Split `area` along `direction` into one sub-rect per constraint.
///
/// An empty constraint list yields an empty result. A zero-sized `area`
/// yields zero-sized sub-rects, one per constraint.
pub fn split(area: Rect, direction: Direction, constraints: &[Constraint]) -> Vec<Rect> {
    if constraints.is_empty() {
        return Vec::new();
    }

    let axis_size = match direction {
        Direction::Horizontal => area.width(),
        Direction::Vertical => area.height(),
    };

    let sizes = solve(axis_size, constraints);

    let mut rects = Vec::with_capacity(constraints.len());
    let mut offset = 0u16;
    for &size in &sizes {
        let rect = match direction {
            Direction::Horizontal => Rect::new(area.x() + offset, area.y(), size, area.height()),
            Direction::Vertical => Rect::new(area.x(), area.y() + offset, area.width(), size),
        };
        rects.push(rect);
        offset += size;
    }
    rects
}

/// Compute the final integer size of each constraint along an axis of
/// length `axis_size`, per the three-pass lower-bound / slack / clamp
/// algorithm.
fn solve(axis_size: u16, constraints: &[Constraint]) -> Vec<u16> {
    let s = u32::from(axis_size);

    // Pass 1: lower bounds.
    let mut sizes: Vec<u32> = constraints
        .iter()
        .map(|c| match *c {
            Constraint::Length(n) => u32::from(n),
            Constraint::Min(n) => u32::from(n),
            Constraint::Max(_) => 0,
            Constraint::Ratio(a, b) => {
                if b == 0 {
                    0
                } else {
                    s * a / b
                }
            }
            Constraint::Flex(_) => 0,
        })
        .collect();

    let lower_sum: u32 = sizes.iter().sum();
    let remaining = s as i64 - lower_sum as i64;

    if remaining >= 0 {
        distribute_slack(&mut sizes, constraints, remaining as u32);
    } else {
        shrink(&mut sizes, constraints, (-remaining) as u32);
    }

    // Pass 3: clamp and fix rounding so the sum is exactly axis_size.
    let mut result: Vec<u16> = sizes.iter().map(|&n| n.min(u32::from(u16::MAX)) as u16).collect();
    fixup_sum(&mut result, axis_size);
    result
}

fn distribute_slack(sizes: &mut [u32], constraints: &[Constraint], remaining: u32) {
    let flex_total_weight: u32 = constraints
        .iter()
        .filter_map(|c| match c {
            Constraint::Flex(w) => Some(u32::from(*w)),
            _ => None,
        })
        .sum();

    if flex_total_weight > 0 {
        distribute_by_weight(
            sizes,
            constraints,
            remaining,
            flex_total_weight,
            |c| matches!(c, Constraint::Flex(_)),
            |c| match c {
                Constraint::Flex(w) => u32::from(*w),
                _ => 0,
            },
        );
        return;
    }

    let max_indices: Vec<usize> = constraints
        .iter()
        .enumerate()
        .filter_map(|(i, c)| matches!(c, Constraint::Max(_)).then_some(i))
        .collect();

    if !max_indices.is_empty() {
        let mut rem = remaining;
        for &i in &max_indices {
            let Constraint::Max(cap) = constraints[i] else {
                unreachable!()
            };
            let cap = u32::from(cap);
            let take = rem.min(cap.saturating_sub(sizes[i]));
            sizes[i] += take;
            rem -= take;
        }
        if rem > 0 {
            if let Some(&last) = max_indices.last() {
                sizes[last] += rem;
            }
        }
        return;
    }

    let min_indices: Vec<usize> = constraints
        .iter()
        .enumerate()
        .filter_map(|(i, c)| matches!(c, Constraint::Min(_)).then_some(i))
        .collect();

    if !min_indices.is_empty() {
        let per = remaining / min_indices.len() as u32;
        let mut extra = remaining % min_indices.len() as u32;
        for &i in &min_indices {
            let mut add = per;
            if extra > 0 {
                add += 1;
                extra -= 1;
            }
            sizes[i] += add;
        }
        return;
    }

    if remaining > 0 {
        if let Some(last) = sizes.last_mut() {
            *last += remaining;
        }
    }
}

/// Distribute `remaining` across the constraints selected by `is_target`, in
/// proportion to `weight_of`, breaking ties by list order (earlier items get
/// their +1 remainder first).
fn distribute_by_weight(
    sizes: &mut [u32],
    constraints: &[Constraint],
    remaining: u32,
    total_weight: u32,
    is_target: impl Fn(&Constraint) -> bool,
    weight_of: impl Fn(&Constraint) -> u32,
) {
    let mut shares = vec![0u32; sizes.len()];
    let mut assigned = 0u32;
    let mut remainders: Vec<(usize, u32)> = Vec::new();

    for (i, c) in constraints.iter().enumerate() {
        if !is_target(c) {
            continue;
        }
        let w = weight_of(c);
        let share = remaining as u64 * u64::from(w) / u64::from(total_weight);
        let share = share as u32;
        shares[i] = share;
        assigned += share;
        let rem = (remaining as u64 * u64::from(w)) % u64::from(total_weight);
        remainders.push((i, rem as u32));
    }

    let mut leftover = remaining - assigned;
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (i, _) in remainders {
        if leftover == 0 {
            break;
        }
        shares[i] += 1;
        leftover -= 1;
    }

    for (i, share) in shares.into_iter().enumerate() {
        sizes[i] += share;
    }
}

fn shrink(sizes: &mut [u32], constraints: &[Constraint], mut deficit: u32) {
    let flex_total_weight: u32 = constraints
        .iter()
        .filter_map(|c| match c {
            Constraint::Flex(w) => Some(u32::from(*w)),
            _ => None,
        })
        .sum();
    if flex_total_weight > 0 && deficit > 0 {
        // Flex lower bounds are already zero; nothing to shrink there.
        // Fall through to the next priority class.
    }

    for class in [ClassKind::Max, ClassKind::Min, ClassKind::Length] {
        if deficit == 0 {
            break;
        }
        let indices: Vec<usize> = constraints
            .iter()
            .enumerate()
            .filter_map(|(i, c)| class.matches(c).then_some(i))
            .collect();
        if indices.is_empty() {
            continue;
        }
        let available: u32 = indices.iter().map(|&i| sizes[i]).sum();
        let take = deficit.min(available);
        if available == 0 {
            continue;
        }
        let mut remaining_take = take;
        for (n, &i) in indices.iter().enumerate() {
            let share = if n == indices.len() - 1 {
                remaining_take
            } else {
                take * sizes[i] / available
            };
            let share = share.min(sizes[i]);
            sizes[i] -= share;
            remaining_take -= share;
        }
        deficit -= take;
    }
}

#[derive(Clone, Copy)]
enum ClassKind {
    Max,
    Min,
    Length,
}

impl ClassKind {
    fn matches(self, c: &Constraint) -> bool {
        match self {
            Self::Max => matches!(c, Constraint::Max(_)),
            Self::Min => matches!(c, Constraint::Min(_)),
            Self::Length => matches!(c, Constraint::Length(_)),
        }
    }
}

fn fixup_sum(sizes: &mut [u16], target: u16) {
    let sum: u32 = sizes.iter().map(|&n| u32::from(n)).sum();
    let target = u32::from(target);
    if sum == target {
        return;
    }
    if sum < target {
        let mut diff = target - sum;
        if let Some(last) = sizes.last_mut() {
            let add = diff.min(u32::from(u16::MAX) - u32::from(*last));
            *last += add as u16;
            diff -= add;
        }
        debug_assert_eq!(diff, 0);
    } else {
        let mut diff = sum - target;
        for size in sizes.iter_mut().rev() {
            if diff == 0 {
                break;
            }
            let take = diff.min(u32::from(*size));
            *size -= take as u16;
            diff -= take;
        }
    }
}
