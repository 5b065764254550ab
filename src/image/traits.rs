/// Row access to a single-channel buffer.
pub trait ImageView {
    type Pixel: Copy;

    /// `(width, height)` in pixels.
    fn dims(&self) -> (usize, usize);

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    /// True when both views cover the same `width × height` grid.
    fn same_shape<O: ImageView + ?Sized>(&self, other: &O) -> bool {
        self.dims() == other.dims()
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    /// Overwrite every pixel with `f(x, y)`, row by row.
    fn fill_with(&mut self, mut f: impl FnMut(usize, usize) -> Self::Pixel)
    where
        Self: Sized,
    {
        let (_, h) = self.dims();
        for y in 0..h {
            for (x, px) in self.row_mut(y).iter_mut().enumerate() {
                *px = f(x, y);
            }
        }
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.dims().1 {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
