pub mod gravfield_vis2d;
