use super::points::SitePoint;

/// Triangular-stack address for a fallen point's rest position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PileSlot {
    pub row: u32,
    pub col: u32,
    pub row_width: u32,
    pub total_rows: u32,
}

/// Smallest number of triangle rows whose slot count covers `count` points.
pub fn triangle_rows(count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    ((-1.0 + (1.0 + 8.0 * count as f64).sqrt()) / 2.0).ceil() as u32
}

/// Assigns every qualifying point (defined last-seen month inside the
/// horizon) exactly one pile slot. The bottom row (index `total_rows - 1`)
/// fills first, columns left to right, consuming points in ascending
/// last-seen order with ties kept in input order; leftover slots in the last
/// processed row stay empty. Returns the number of rows.
pub fn assign_pile_slots(points: &mut [SitePoint], horizon_months: u32) -> u32 {
    let mut order = points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            point
                .last_seen_month
                .filter(|month| *month < horizon_months)
                .map(|month| (index, month))
        })
        .collect::<Vec<_>>();
    order.sort_by_key(|(_, month)| *month);

    let total_rows = triangle_rows(order.len());
    let mut queue = order.into_iter();

    for row in (0..total_rows).rev() {
        let row_width = row + 1;
        for col in 0..row_width {
            let Some((index, _month)) = queue.next() else {
                return total_rows;
            };
            points[index].pile_slot = Some(PileSlot {
                row,
                col,
                row_width,
                total_rows,
            });
        }
    }

    total_rows
}

/// Rest coordinates for a slot: rows are centered horizontally and stacked
/// upward from the ground line.
pub fn pile_target(slot: PileSlot, spacing_x: f32, spacing_y: f32, ground_y: f32) -> (f32, f32) {
    let x = (slot.col as f32 - (slot.row_width as f32 - 1.0) / 2.0) * spacing_x;
    let y = ground_y - (slot.total_rows - 1 - slot.row) as f32 * spacing_y;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::super::points::test_point;
    use super::*;

    const HORIZON: u32 = 348;

    #[test]
    fn triangle_rows_covers_the_point_count() {
        assert_eq!(triangle_rows(0), 0);
        assert_eq!(triangle_rows(1), 1);
        assert_eq!(triangle_rows(3), 2);
        assert_eq!(triangle_rows(4), 3);
        assert_eq!(triangle_rows(10), 4);
        assert_eq!(triangle_rows(11), 5);
    }

    #[test]
    fn every_qualifying_point_gets_exactly_one_slot() {
        let months = [0, 0, 1, 5, 10, 50, 100, 200, 300, 347];
        let mut points = months
            .iter()
            .map(|month| test_point(Some(*month)))
            .collect::<Vec<_>>();
        points.push(test_point(None));

        let rows = assign_pile_slots(&mut points, HORIZON);
        assert_eq!(rows, 4);

        for point in points.iter().take(months.len()) {
            let slot = point.pile_slot.expect("qualifying point has a slot");
            assert!(slot.col <= slot.row);
            assert!(slot.row < rows);
            assert_eq!(slot.total_rows, rows);
            assert_eq!(slot.row_width, slot.row + 1);
        }
        assert!(points[months.len()].pile_slot.is_none());
    }

    #[test]
    fn bottom_row_fills_first_in_ascending_last_seen_order() {
        let months = [0, 0, 1, 5, 10, 50, 100, 200, 300, 347];
        let mut points = months
            .iter()
            .map(|month| test_point(Some(*month)))
            .collect::<Vec<_>>();

        assign_pile_slots(&mut points, HORIZON);

        let expected = [
            (3, 0),
            (3, 1),
            (3, 2),
            (3, 3),
            (2, 0),
            (2, 1),
            (2, 2),
            (1, 0),
            (1, 1),
            (0, 0),
        ];
        for (point, (row, col)) in points.iter().zip(expected) {
            let slot = point.pile_slot.unwrap();
            assert_eq!((slot.row, slot.col), (row, col));
        }
    }

    #[test]
    fn assignment_is_deterministic() {
        let months = [12, 3, 3, 200, 47, 3, 0];
        let mut first = months
            .iter()
            .map(|month| test_point(Some(*month)))
            .collect::<Vec<_>>();
        let mut second = first.clone();

        assign_pile_slots(&mut first, HORIZON);
        assign_pile_slots(&mut second, HORIZON);

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.pile_slot, b.pile_slot);
        }
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let mut points: Vec<SitePoint> = Vec::new();
        assert_eq!(assign_pile_slots(&mut points, HORIZON), 0);

        let mut slotless = vec![test_point(None), test_point(None)];
        assert_eq!(assign_pile_slots(&mut slotless, HORIZON), 0);
        assert!(slotless.iter().all(|point| point.pile_slot.is_none()));
    }

    #[test]
    fn pile_targets_center_rows_and_stack_upward() {
        let bottom = PileSlot {
            row: 3,
            col: 0,
            row_width: 4,
            total_rows: 4,
        };
        let apex = PileSlot {
            row: 0,
            col: 0,
            row_width: 1,
            total_rows: 4,
        };

        let (bx, by) = pile_target(bottom, 7.0, 7.0, 1500.0);
        assert!((bx - (-10.5)).abs() < 1e-6);
        assert!((by - 1500.0).abs() < 1e-6);

        let (ax, ay) = pile_target(apex, 7.0, 7.0, 1500.0);
        assert!(ax.abs() < 1e-6);
        assert!((ay - (1500.0 - 21.0)).abs() < 1e-6);
    }
}
