// The rotating palette farms are colored with. Neighbouring farms get
// visually distinct colors and the assignment never changes between renders.
pub const PALETTE: [&str; 20] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FECA57", "#FF9FF3", "#54A0FF", "#5F27CD",
    "#00D2D3", "#FF9F43", "#686DE0", "#4B7BEC", "#A3CB38", "#FDA7DF", "#D63031", "#74B9FF",
    "#0984E3", "#6C5CE7", "#FDCB6E", "#E17055",
];

// Color for the farm at a given list index, wrapping around past the end
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
