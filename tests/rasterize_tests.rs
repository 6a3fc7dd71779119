// End-to-end checks of scanline building plus span rasterization.
//
// Every test renders into a plain Vec<Color> the way a caller would, then
// inspects rows of the result.

use rand::SeedableRng;
use rand::rngs::StdRng;
use scanraster::{
    MaterialTable, RasterError, Rasterizer, Scanlines, Scene, Triangle2D, TriangleId, build_scanlines, rasterize,
    rasterize_parallel,
};
use scanraster::scanline::{Intersection, Scanline};

const BG: u32 = 0x000000FF;
const RED: u32 = 0xFF0000FF;
const GREEN: u32 = 0x00FF00FF;

fn render(triangles: &[Triangle2D], colors: &[u32], width: usize, height: usize) -> Vec<u32> {
    let scanlines = build_scanlines(triangles, height).unwrap();
    let mut pixels = vec![0; width * height];
    rasterize(&mut pixels, width, height, &scanlines, &MaterialTable::new(colors.to_vec()), BG).unwrap();
    pixels
}

fn row(pixels: &[u32], width: usize, y: usize) -> &[u32] {
    &pixels[y * width..(y + 1) * width]
}

/// Columns of `row` holding `color`.
fn columns_of(row: &[u32], color: u32) -> Vec<usize> {
    row.iter().enumerate().filter(|&(_, &p)| p == color).map(|(x, _)| x).collect()
}

#[test]
fn triangles_outside_viewport_touch_nothing() {
    let (width, height) = (64, 48);
    let triangles = [
        // right of the viewport
        Triangle2D::from_coords([70.0, 5.0, 90.0, 10.5, 75.0, 30.0]),
        // left of the viewport
        Triangle2D::from_coords([-50.0, 5.0, -10.0, 10.5, -30.0, 30.0]),
        // above
        Triangle2D::from_coords([10.0, -40.0, 30.0, -20.5, 20.0, -5.0]),
        // below
        Triangle2D::from_coords([10.0, 50.0, 30.0, 70.5, 20.0, 90.0]),
    ];
    let pixels = render(&triangles, &[RED, RED, RED, RED], width, height);
    assert!(pixels.iter().all(|&p| p == BG), "off-screen triangles must leave the buffer untouched");
}

#[test]
fn single_triangle_matches_edge_crossings() {
    let (width, height) = (64, 48);
    let triangle = Triangle2D::from_coords([5.5, 1.5, 58.3, 20.25, 12.7, 45.9]);
    let pixels = render(&[triangle], &[RED], width, height);

    for y in 0..height {
        let h = y as f64;
        let crossings: Vec<f64> = triangle
            .edges()
            .iter()
            .filter_map(|edge| {
                let (x0, y0) = (edge.start.x as f64, edge.start.y as f64);
                let (x1, y1) = (edge.end.x as f64, edge.end.y as f64);
                if (y0 - h) * (y1 - h) < 0.0 {
                    Some(x0 + (h - y0) * (x1 - x0) / (y1 - y0))
                } else {
                    None
                }
            })
            .collect();

        let colored = columns_of(row(&pixels, width, y), RED);
        if crossings.is_empty() {
            assert!(colored.is_empty(), "row {} lies outside the triangle", y);
            continue;
        }
        assert_eq!(crossings.len(), 2, "row {} should cross exactly two edges", y);

        let left = crossings[0].min(crossings[1]).floor() as i64;
        let right = crossings[0].max(crossings[1]).floor() as i64;
        if colored.is_empty() {
            assert!(right - left <= 1, "row {} lost its span [{}, {})", y, left, right);
            continue;
        }

        let first = colored[0] as i64;
        let end = *colored.last().unwrap() as i64 + 1;
        assert_eq!(colored.len() as i64, end - first, "row {} span must be contiguous", y);
        assert!((first - left).abs() <= 1, "row {} starts at {}, expected {}", y, first, left);
        assert!((end - right).abs() <= 1, "row {} ends at {}, expected {}", y, end, right);
    }
}

#[test]
fn disjoint_triangles_render_independently() {
    let (width, height) = (80, 40);
    let a = Triangle2D::from_coords([2.0, 2.5, 30.0, 10.0, 8.0, 35.5]);
    let b = Triangle2D::from_coords([45.0, 4.5, 78.0, 20.0, 50.0, 38.5]);

    let both = render(&[a, b], &[RED, GREEN], width, height);
    let only_a = render(&[a], &[RED], width, height);
    let only_b = render(&[b], &[GREEN], width, height);

    for i in 0..width * height {
        let expected = if only_a[i] != BG { only_a[i] } else { only_b[i] };
        assert_eq!(both[i], expected, "pixel ({}, {}) differs", i % width, i / width);
    }
    assert!(both.contains(&RED) && both.contains(&GREEN));
}

// A spans [10, 50) and B spans [30, 70) on row 5; B opens later and wins the overlap.
#[test]
fn overlap_resolves_to_most_recently_opened() {
    let (width, height) = (100, 12);
    let a = Triangle2D::from_coords([10.0, -100.0, 10.0, 100.0, 50.0, 5.0]);
    let b = Triangle2D::from_coords([30.0, -100.0, 30.0, 100.0, 70.0, 5.0]);
    let pixels = render(&[a, b], &[RED, GREEN], width, height);
    let row5 = row(&pixels, width, 5);

    assert_eq!(columns_of(row5, RED), (10..30).collect::<Vec<_>>());
    assert_eq!(columns_of(row5, GREEN), (30..70).collect::<Vec<_>>());
    for x in 30..=50 {
        assert_eq!(row5[x], GREEN, "column {} should resolve to B", x);
    }
    assert_eq!(row5[9], BG);
    assert_eq!(row5[70], BG);
}

#[test]
fn overlap_follows_opening_column_not_input_order() {
    let (width, height) = (100, 12);
    let a = Triangle2D::from_coords([10.0, -100.0, 10.0, 100.0, 50.0, 5.0]);
    let b = Triangle2D::from_coords([30.0, -100.0, 30.0, 100.0, 70.0, 5.0]);
    // B listed first still opens last
    let pixels = render(&[b, a], &[GREEN, RED], width, height);
    let row5 = row(&pixels, width, 5);
    assert_eq!(row5[29], RED);
    assert_eq!(row5[30], GREEN);
    assert_eq!(row5[49], GREEN);
}

#[test]
fn scanline_is_sorted_by_column() {
    // left edges at 40, 10 and 25, in that input order
    let triangles: Vec<Triangle2D> = [40.0, 10.0, 25.0]
        .iter()
        .map(|&x| Triangle2D::from_coords([x, 0.5, x, 20.5, x + 20.0, 20.5]))
        .collect();
    let scanlines = build_scanlines(&triangles, 10).unwrap();
    let hits = scanlines.row(5).unwrap().intersections();
    let xs: Vec<i32> = hits.iter().map(|hit| hit.x).collect();

    assert_eq!(xs.len(), 6);
    assert!(xs.windows(2).all(|pair| pair[0] <= pair[1]), "unsorted row {:?}", xs);
    let left_edges: Vec<i32> = xs.iter().copied().filter(|x| [10, 25, 40].contains(x)).collect();
    assert_eq!(left_edges, vec![10, 25, 40]);
    assert_eq!(hits[0].triangle, TriangleId(1));
}

#[test]
fn hand_built_row_sorts_to_ascending_order() {
    let mut scanline = Scanline::with_capacity(3);
    for (x, id) in [(40, 0), (10, 1), (25, 2)] {
        scanline.push(Intersection { x, triangle: TriangleId(id) });
    }
    scanline.sort();
    let xs: Vec<i32> = scanline.intersections().iter().map(|hit| hit.x).collect();
    assert_eq!(xs, vec![10, 25, 40]);
}

#[test]
fn rendering_is_deterministic() {
    let (width, height) = (96, 64);
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let scene = Scene::random(200, width as u32, height as u32, &mut rng);

    let first = render(&scene.triangles, &scene.colors, width, height);
    let second = render(&scene.triangles, &scene.colors, width, height);
    assert_eq!(first, second);

    let mut scanlines = Scanlines::for_triangles(height, scene.len());
    scanlines.build_parallel(&scene.triangles).unwrap();
    let mut parallel = vec![0; width * height];
    rasterize_parallel(&mut parallel, width, height, &scanlines, &scene.materials(), BG).unwrap();
    assert_eq!(first, parallel, "parallel rows must match the serial render");

    let mut rasterizer = Rasterizer::new(width, height).with_background(BG);
    let mut owned = vec![0; width * height];
    rasterizer.render(&scene.triangles, &scene.materials(), &mut owned).unwrap();
    assert_eq!(first, owned);
}

#[test]
fn vertex_on_scan_row_renders_clean_span() {
    let (width, height) = (48, 24);
    // middle vertex exactly on row 10
    let triangle = Triangle2D::from_coords([5.0, 0.5, 40.0, 10.0, 5.0, 20.5]);
    let scanlines = build_scanlines(&[triangle], height).unwrap();
    assert_eq!(scanlines.row(10).unwrap().len(), 2, "duplicate vertex hit must be capped");

    let pixels = render(&[triangle], &[RED], width, height);
    assert_eq!(columns_of(row(&pixels, width, 10), RED), (5..40).collect::<Vec<_>>());

    for y in 0..height {
        let colored = columns_of(row(&pixels, width, y), RED);
        if let (Some(&first), Some(&last)) = (colored.first(), colored.last()) {
            assert_eq!(colored.len(), last - first + 1, "row {} must be one span", y);
            assert!(first >= 5 && last < 40, "row {} leaks outside the triangle", y);
        }
        assert!(row(&pixels, width, y).iter().all(|&p| p == RED || p == BG));
    }
}

#[test]
fn apex_on_scan_row_opens_and_closes_in_place() {
    let (width, height) = (40, 20);
    let triangle = Triangle2D::from_coords([20.0, 3.0, 35.0, 15.5, 5.0, 15.5]);
    let pixels = render(&[triangle], &[RED], width, height);
    assert!(columns_of(row(&pixels, width, 3), RED).is_empty());
    assert!(columns_of(row(&pixels, width, 2), RED).is_empty());
    assert!(!columns_of(row(&pixels, width, 4), RED).is_empty());
}

#[test]
fn unmatched_hit_leaves_triangle_open_to_row_end() {
    let width = 12;
    let mut rows = vec![Scanline::from_intersections(vec![Intersection { x: 3, triangle: TriangleId(0) }])];
    rows.push(Scanline::from_intersections(vec![
        Intersection { x: 1, triangle: TriangleId(0) },
        Intersection { x: 4, triangle: TriangleId(0) },
    ]));
    let scanlines = Scanlines::from_rows(rows);
    let mut pixels = vec![0; width * 2];
    rasterize(&mut pixels, width, 2, &scanlines, &MaterialTable::new(vec![RED]), BG).unwrap();

    assert_eq!(columns_of(row(&pixels, width, 0), RED), (3..12).collect::<Vec<_>>());
    // the stack is reset for the next row
    assert_eq!(columns_of(row(&pixels, width, 1), RED), vec![1, 2, 3]);
}

#[test]
fn undersized_scanline_storage_is_an_error() {
    let a = Triangle2D::from_coords([0.0, 0.5, 20.0, 5.0, 2.0, 9.5]);
    let b = Triangle2D::from_coords([4.0, 0.5, 24.0, 5.0, 6.0, 9.5]);
    let mut scanlines = Scanlines::with_capacity(10, 2);
    let result = scanlines.build_into(&[a, b]);
    assert_eq!(result, Err(RasterError::CapacityExceeded { row: 1, capacity: 2 }));
}
