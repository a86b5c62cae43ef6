#[cfg(test)]
mod units {
    use crate::geometry::cell::{Cell, CellSurface};
    use crate::geometry::surface::{BoundaryCondition, Surface};
    use crate::geometry::{Geometry, Coordinate, Direction};

    /// A sphere of radius 1 centered at the origin, split into an inner cell and an
    /// outer vacuum-bounded cell — the minimal two-cell geometry used across these
    /// tests.
    fn unit_sphere_geometry() -> Geometry {
        let sphere = Surface::sphere(1, Coordinate::zero(), 1.0, BoundaryCondition::Vacuum);
        let inner = Cell::new(
            1,
            vec![CellSurface {
                surface: 0,
                sense: false,
            }],
            Some(0),
        );
        let outer = Cell::new(
            2,
            vec![CellSurface {
                surface: 0,
                sense: true,
            }],
            None,
        );
        Geometry::new(vec![sphere], vec![inner, outer])
    }

    #[test]
    fn point_inside_sphere_belongs_to_inner_cell() {
        let geom = unit_sphere_geometry();
        assert_eq!(geom.find_cell(Coordinate::new(0.1, 0.0, 0.0)), Some(0));
    }

    #[test]
    fn point_outside_sphere_belongs_to_outer_cell() {
        let geom = unit_sphere_geometry();
        assert_eq!(geom.find_cell(Coordinate::new(5.0, 0.0, 0.0)), Some(1));
    }

    #[test]
    fn negated_cell_complements_its_surface_list() {
        let sphere = Surface::sphere(1, Coordinate::zero(), 1.0, BoundaryCondition::Vacuum);
        let inside_sense_true = Cell::new(
            1,
            vec![CellSurface {
                surface: 0,
                sense: true,
            }],
            Some(0),
        )
        .negated();
        let surfaces = vec![sphere];
        // Negated cell with "sense=true" requirement claims every point with
        // sense=false, i.e. the sphere's interior.
        assert!(inside_sense_true.contains(Coordinate::new(0.1, 0.0, 0.0), &surfaces));
        assert!(!inside_sense_true.contains(Coordinate::new(5.0, 0.0, 0.0), &surfaces));
    }

    #[test]
    fn plane_reflection_mirrors_direction_about_normal() {
        let plane = Surface::plane(
            1,
            Direction::new(1.0, 0.0, 0.0),
            0.0,
            BoundaryCondition::Reflecting,
        )
        .with_neighbors(Some(0), Some(0));
        let mut dir = Direction::new(-1.0, 0.5, 0.0).normalize();
        plane.cross(Coordinate::new(0.0, 1.0, 0.0), &mut dir, false, 0).unwrap();
        // Reflecting off the x=0 plane flips the x component and preserves y, z.
        assert!(dir.x > 0.0);
    }

    #[test]
    fn dangling_transmission_neighbor_is_a_fatal_geometry_error() {
        let plane = Surface::plane(
            2,
            Direction::new(1.0, 0.0, 0.0),
            0.0,
            BoundaryCondition::Transmission,
        );
        let mut dir = Direction::new(1.0, 0.0, 0.0);
        let err = plane
            .cross(Coordinate::new(0.0, 0.0, 0.0), &mut dir, true, 3)
            .unwrap_err();
        match err {
            crate::error::GeometryError::DanglingNeighbor { surface, target } => {
                assert_eq!(surface, 2);
                assert_eq!(target, 3);
            }
            other => panic!("expected DanglingNeighbor, got {other:?}"),
        }
    }

    #[test]
    fn vacuum_boundary_with_no_neighbor_is_an_ordinary_leak_not_an_error() {
        let sphere = Surface::sphere(3, Coordinate::zero(), 1.0, BoundaryCondition::Vacuum);
        let mut dir = Direction::new(1.0, 0.0, 0.0);
        let result = sphere
            .cross(Coordinate::new(1.0, 0.0, 0.0), &mut dir, true, 0)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn sphere_intersection_gives_two_roots_nearest_first() {
        let sphere = Surface::sphere(1, Coordinate::zero(), 1.0, BoundaryCondition::Vacuum);
        let hit = sphere.intersect(Coordinate::new(-5.0, 0.0, 0.0), Direction::new(1.0, 0.0, 0.0));
        assert!((hit.unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn ray_parallel_to_cylinder_axis_never_crosses() {
        let cyl = Surface::cylinder(
            1,
            Coordinate::zero(),
            Direction::new(0.0, 0.0, 1.0),
            1.0,
            BoundaryCondition::Vacuum,
        );
        assert!(cyl
            .intersect(Coordinate::new(5.0, 0.0, 0.0), Direction::new(0.0, 0.0, 1.0))
            .is_none());
    }
}
